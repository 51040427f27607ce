//! Noyau — évaluateur arithmétique sûr
//!
//! Remplace `eval()` pour le calcul du pavé sous CSP stricte :
//! grammaire à quatre opérateurs + parenthèses + moins unaire, sortie
//! `f64`, refus typé de tout le reste.
//!
//! Organisation interne :
//! - erreur.rs  : taxonomie `ErreurEval`
//! - jetons.rs  : tokenisation + validation de caractères
//! - eval.rs    : descente récursive (expression / terme / facteur)

pub mod erreur;
pub mod eval;
pub mod jetons;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurEval;
pub use eval::evaluer;
