//! Participant (attendee) model

use serde::{Deserialize, Serialize};

/// Attendee record attached to a ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub nome: Option<String>,
    pub nome_completo: Option<String>,
    pub cpf: Option<String>,
}

impl Participant {
    /// Display name, preferring the short form.
    pub fn display_name(&self) -> &str {
        self.nome
            .as_deref()
            .or(self.nome_completo.as_deref())
            .unwrap_or("Ingresso")
    }
}
