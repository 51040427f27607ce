//! Calculatrice Guichet
//!
//! Une calculatrice de bureau avec un panneau « guichet de change » :
//! - noyau   : évaluateur arithmétique sûr (remplace eval())
//! - pont    : liaison ligne-JSON vers le serveur guichet (FIFO + échéances)
//! - guichet : domaine du guichet (cotations FinMind, règles, guichetier)
//! - app     : UI egui (pavé numérique + panneau guichet)
//!
//! Le binaire `calculatrice` porte l'UI ; le binaire `guichet-serveur`
//! est le processus enfant que le pont pilote.

pub mod app;
pub mod guichet;
pub mod noyau;
pub mod pont;
