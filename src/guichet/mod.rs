//! Guichet — domaine du guichet de change
//!
//! Organisation interne :
//! - taux.rs  : cotations Banque de Taïwan via FinMind (HTTPS)
//! - agent.rs : le guichetier (règles, conversions, questions en langage
//!              naturel, table de dispatch du serveur)

pub mod agent;
pub mod taux;

// API publique minimale
pub use agent::Guichetier;
