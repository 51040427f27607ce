// src/pont/protocole.rs
//
// Vocabulaire du fil : une requête = un objet JSON sur une ligne, étiqueté
// par son champ `action` ; une réponse = un objet JSON sur une ligne,
// appariée par ordre d'arrivée (FIFO strict, pas d'identifiant).
//
// Les noms de champs sont ceux du serveur historique : ne pas les
// franciser, ils sont le contrat.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Type de taux côté banque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeTaux {
    CashBuy,
    #[default]
    CashSell,
    SpotBuy,
    SpotSell,
}

impl fmt::Display for TypeTaux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let libelle = match self {
            TypeTaux::CashBuy => "achat billets",
            TypeTaux::CashSell => "vente billets",
            TypeTaux::SpotBuy => "achat devises",
            TypeTaux::SpotSell => "vente devises",
        };
        f.write_str(libelle)
    }
}

fn vrai() -> bool {
    true
}

/// Les six actions servies par le guichet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Requete {
    ExchangeRate {
        currency: String,
        #[serde(default)]
        rate_type: TypeTaux,
    },
    CalculateExchange {
        currency: String,
        twd_amount: f64,
        #[serde(default = "vrai")]
        is_buying: bool,
    },
    GetMultipleRates {
        currencies: Vec<String>,
    },
    GetBankRules {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
    BankAgentInfo,
    AiChat {
        query: String,
    },
}

/// Cotation d'une devise, vue client (champs absents tolérés).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InfoTaux {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cash_buy: f64,
    #[serde(default)]
    pub cash_sell: f64,
    #[serde(default)]
    pub spot_buy: f64,
    #[serde(default)]
    pub spot_sell: f64,
    #[serde(default)]
    pub selected_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<TypeTaux>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Résultat d'une conversion TWD <-> devise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReponseCalcul {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub twd_amount: f64,
    #[serde(default)]
    pub foreign_amount: f64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<TypeTaux>,
    /// « achat » ou « vente », du point de vue du client.
    #[serde(default, rename = "action")]
    pub operation: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Réponse du guichetier en langage naturel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReponseChat {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Enveloppe d'échec standard du serveur.
pub fn enveloppe_erreur(message: impl Into<String>) -> Value {
    json!({ "success": false, "error": message.into() })
}
