use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use time::OffsetDateTime;
use wellness::config::{ClientConfig, ConfigError};
use wellness::net::types::{HumorLevel, HumorLevelError, QuestionKind, User};
use wellness::services;
use wellness::state::Alert;
use wellness::state::checkin::CheckInForm;
use wellness::state::history::HistoryView;
use wellness::state::login::LoginForm;
use wellness::state::materials::MaterialsView;
use wellness::state::password::{NewPasswordForm, RecoverPasswordForm};
use wellness::state::survey_answer::{AnswerError, AnswerSheet, SurveyAnswerView};
use wellness::state::surveys::SurveyListView;
use wellness::{ApiError, FileStore, SessionManager};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("not signed in; run `wellness login` first")]
    NotSignedIn,
    #[error("{0}")]
    Rejected(String),
    #[error("invalid humor level: {0}")]
    Humor(#[from] HumorLevelError),
    #[error("invalid answer `{0}`; expected QUESTION=VALUE")]
    InvalidAnswer(String),
    #[error("{0}")]
    Answer(#[from] AnswerError),
    #[error("material file name `{0}` has no usable file component; pass --output")]
    UnusableFileName(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "wellness", about = "Employee wellness client")]
struct Cli {
    /// Backend URL; overrides WELLNESS_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// File holding the persisted session.
    #[arg(long, env = "WELLNESS_STORE_PATH", default_value = ".wellness-session.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long, env = "WELLNESS_EMAIL")]
        email: String,
        #[arg(long, env = "WELLNESS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Password(PasswordCommand),
    Checkin {
        /// 1 (Muito Ruim) to 5 (Excelente).
        #[arg(long)]
        humor: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    History,
    Materials(MaterialsCommand),
    Surveys(SurveysCommand),
}

#[derive(Args, Debug)]
struct PasswordCommand {
    #[command(subcommand)]
    command: PasswordSubcommand,
}

#[derive(Subcommand, Debug)]
enum PasswordSubcommand {
    Forgot {
        email: String,
    },
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long, hide_env_values = true, env = "WELLNESS_NEW_PASSWORD")]
        password: String,
        #[arg(long, hide_env_values = true, env = "WELLNESS_NEW_PASSWORD_CONFIRMATION")]
        confirmation: String,
    },
}

#[derive(Args, Debug)]
struct MaterialsCommand {
    #[command(subcommand)]
    command: MaterialsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MaterialsSubcommand {
    List,
    Download {
        id: i64,
        /// Output path; defaults to the material's file name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SurveysCommand {
    #[command(subcommand)]
    command: SurveysSubcommand,
}

#[derive(Subcommand, Debug)]
enum SurveysSubcommand {
    List,
    Show {
        id: i64,
    },
    Answer {
        id: i64,
        /// QUESTION=OPTION for choice questions (repeat for multiple choice),
        /// QUESTION=TEXT for open ones.
        #[arg(long = "answer", value_name = "QUESTION=VALUE")]
        answers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let store = Arc::new(FileStore::new(cli.store));
    let session = SessionManager::from_config(&config, store)?;
    let status = session.restore().await;
    tracing::debug!(base_url = %config.base_url, ?status, "session restored");

    match cli.command {
        Command::Login { email, password } => run_login(&session, email, password).await,
        Command::Logout => {
            session.logout().await;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = signed_in(&session)?;
            print_json(&serde_json::to_value(&user)?)
        }
        Command::Password(password) => run_password(&session, password).await,
        Command::Checkin { humor, comment } => run_checkin(&session, humor, comment).await,
        Command::History => run_history(&session).await,
        Command::Materials(materials) => run_materials(&session, materials).await,
        Command::Surveys(surveys) => run_surveys(&session, surveys).await,
    }
}

fn signed_in(session: &SessionManager) -> Result<User, CliError> {
    session.current_user().ok_or(CliError::NotSignedIn)
}

/// Surface a screen's pending alert or inline error as a failure.
fn rejected(error: Option<String>, alert: Option<Alert>) -> CliError {
    let message = error
        .or_else(|| alert.map(|a| a.message))
        .unwrap_or_else(|| "request failed".to_owned());
    CliError::Rejected(message)
}

fn report(alert: Option<&Alert>) {
    if let Some(alert) = alert {
        eprintln!("{}: {}", alert.title, alert.message);
    }
}

async fn run_login(session: &SessionManager, email: String, password: String) -> Result<(), CliError> {
    let mut form = LoginForm { email, password, ..LoginForm::new() };
    match form.submit(session).await {
        Some(user) => {
            println!("signed in as {} (id {})", user.name, user.id);
            Ok(())
        }
        None => Err(rejected(form.error, form.alert)),
    }
}

async fn run_password(session: &SessionManager, password: PasswordCommand) -> Result<(), CliError> {
    match password.command {
        PasswordSubcommand::Forgot { email } => {
            let mut form = RecoverPasswordForm { email, ..RecoverPasswordForm::default() };
            if !form.submit(session).await {
                return Err(rejected(form.error, form.alert));
            }
            println!("{}", form.message.unwrap_or_default());
            Ok(())
        }
        PasswordSubcommand::Reset { token, password, confirmation } => {
            let mut form = NewPasswordForm { password, confirmation, ..NewPasswordForm::with_token(token) };
            if !form.submit(session).await {
                return Err(rejected(form.error, form.alert));
            }
            report(form.alert.as_ref());
            Ok(())
        }
    }
}

async fn run_checkin(session: &SessionManager, humor: u8, comment: String) -> Result<(), CliError> {
    let user = signed_in(session)?;
    let humor = HumorLevel::try_from(humor)?;
    let mut form = CheckInForm { humor: Some(humor), comment, ..CheckInForm::default() };
    let Some(saved) = form
        .submit(session.api(), user.id, OffsetDateTime::now_utc())
        .await
    else {
        return Err(rejected(form.error, form.alert));
    };
    report(form.alert.as_ref());
    print_json(&serde_json::to_value(&saved)?)
}

async fn run_history(session: &SessionManager) -> Result<(), CliError> {
    let user = signed_in(session)?;
    let mut view = HistoryView::default();
    view.load(session.api(), user.id).await;
    if view.alert.is_some() {
        return Err(rejected(None, view.alert));
    }
    for entry in &view.entries {
        println!("{}  {} {:<10}  {}", entry.date, entry.emoji, entry.label, entry.comment);
    }
    Ok(())
}

async fn run_materials(session: &SessionManager, materials: MaterialsCommand) -> Result<(), CliError> {
    signed_in(session)?;
    let mut view = MaterialsView::default();
    view.load(session.api()).await;
    if view.alert.is_some() {
        return Err(rejected(None, view.alert));
    }

    match materials.command {
        MaterialsSubcommand::List => {
            for material in &view.items {
                let file = material.attachment().unwrap_or("-");
                println!("{:>4}  {}  [{file}]", material.id, material.title);
            }
            Ok(())
        }
        MaterialsSubcommand::Download { id, output } => {
            let Some(download) = view.download(session.api(), id).await else {
                return Err(rejected(None, view.alert));
            };
            let path = download_path(output, &download.file_name)?;
            tokio::fs::write(&path, &download.bytes).await?;
            eprintln!("saved {} bytes to {}", download.bytes.len(), path.display());
            Ok(())
        }
    }
}

async fn run_surveys(session: &SessionManager, surveys: SurveysCommand) -> Result<(), CliError> {
    let user = signed_in(session)?;
    match surveys.command {
        SurveysSubcommand::List => {
            let mut view = SurveyListView::default();
            view.load(session.api(), user.id).await;
            if view.alert.is_some() {
                return Err(rejected(None, view.alert));
            }
            for (heading, items) in [("pending", view.pending().collect::<Vec<_>>()), ("answered", view.answered().collect())] {
                println!("{heading}:");
                for survey in items {
                    let due = survey.due_date.as_deref().unwrap_or("-");
                    println!("  {:>4}  {}  (prazo {due})", survey.id, survey.title);
                }
            }
            Ok(())
        }
        SurveysSubcommand::Show { id } => {
            let survey = services::surveys::fetch(session.api(), id).await?;
            print_json(&serde_json::to_value(&survey)?)
        }
        SurveysSubcommand::Answer { id, answers } => {
            let mut view = SurveyAnswerView::default();
            view.load(session.api(), id).await;
            let Some(sheet) = view.sheet.as_mut() else {
                return Err(rejected(None, view.alert));
            };
            for raw in &answers {
                apply_answer(sheet, raw)?;
            }
            if let Some(question_id) = sheet.first_unanswered() {
                return Err(AnswerError::Incomplete(question_id).into());
            }
            if !view.submit(session.api(), user.id).await {
                return Err(rejected(None, view.alert));
            }
            report(view.alert.as_ref());
            Ok(())
        }
    }
}

/// Where a download lands: `--output` if given, otherwise the last component
/// of the server's file name inside the working directory.
fn download_path(output: Option<PathBuf>, file_name: &str) -> Result<PathBuf, CliError> {
    if let Some(output) = output {
        return Ok(output);
    }
    Path::new(file_name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::UnusableFileName(file_name.to_owned()))
}

/// Apply one `QUESTION=VALUE` argument according to the question's kind.
fn apply_answer(sheet: &mut AnswerSheet, raw: &str) -> Result<(), CliError> {
    let invalid = || CliError::InvalidAnswer(raw.to_owned());
    let (question, value) = raw.split_once('=').ok_or_else(invalid)?;
    let question_id: i64 = question.trim().parse().map_err(|_| invalid())?;
    let kind = sheet
        .survey()
        .questions
        .iter()
        .find(|q| q.id == question_id)
        .map(|q| q.kind.clone())
        .ok_or(AnswerError::UnknownQuestion(question_id))?;

    match kind {
        QuestionKind::SingleChoice { .. } => {
            let option_id = value.trim().parse().map_err(|_| invalid())?;
            sheet.choose(question_id, option_id)?;
        }
        QuestionKind::MultipleChoice { .. } => {
            let option_id = value.trim().parse().map_err(|_| invalid())?;
            sheet.toggle(question_id, option_id)?;
        }
        QuestionKind::OpenText => sheet.write(question_id, value)?,
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
