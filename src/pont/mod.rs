//! Pont — liaison ligne-JSON vers le serveur guichet
//!
//! Organisation interne :
//! - protocole.rs : requêtes/réponses typées (les noms de champs sont le contrat)
//! - client.rs    : processus enfant, file FIFO, échéances, fils lecteur/garde

pub mod client;
pub mod protocole;

// API publique minimale
pub use client::{ErreurPont, Livraison, Pont, DELAI_REPONSE};
pub use protocole::Requete;
