//! Support materials list, detail and download.

use crate::net::http::ApiClient;
use crate::net::types::Material;
use crate::services;
use crate::state::Alert;

pub const MATERIALS_FAILED_MESSAGE: &str = "Não foi possível carregar os materiais de apoio.";
pub const NO_ATTACHMENT_MESSAGE: &str = "Este material não possui arquivo para download.";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Não foi possível baixar o arquivo.";

/// A fetched attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialsView {
    pub loading: bool,
    pub items: Vec<Material>,
    pub selected: Option<i64>,
    pub alert: Option<Alert>,
}

impl MaterialsView {
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        self.alert = None;
        match services::materials::list(api).await {
            Ok(items) => self.items = items,
            Err(_) => {
                self.items.clear();
                self.alert = Some(Alert::error(MATERIALS_FAILED_MESSAGE));
            }
        }
        if self.selected().is_none() {
            self.selected = None;
        }
        self.loading = false;
    }

    /// Open the detail for `id`. Unknown ids close the detail instead.
    pub fn select(&mut self, id: i64) -> Option<&Material> {
        self.selected = self.items.iter().any(|m| m.id == id).then_some(id);
        self.selected()
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Material> {
        let id = self.selected?;
        self.items.iter().find(|m| m.id == id)
    }

    /// Fetch the attachment of material `id`.
    pub async fn download(&mut self, api: &ApiClient, id: i64) -> Option<Download> {
        let Some(file_name) = self
            .items
            .iter()
            .find(|m| m.id == id)
            .and_then(Material::attachment)
            .map(str::to_owned)
        else {
            self.alert = Some(Alert::error(NO_ATTACHMENT_MESSAGE));
            return None;
        };

        match services::materials::download(api, &file_name).await {
            Ok(bytes) => Some(Download { file_name, bytes }),
            Err(_) => {
                self.alert = Some(Alert::error(DOWNLOAD_FAILED_MESSAGE));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "materials_test.rs"]
mod tests;
