//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler l'évaluateur sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - seules les erreurs de la taxonomie sont admises (jamais de panique)
//! - invariant clé : un succès est toujours un f64 fini

use std::time::{Duration, Instant};

use super::erreur::ErreurEval;
use super::evaluer;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_atome(rng: &mut Rng) -> String {
    // petits entiers + quelques décimaux ; zéro inclus (utile pour /0)
    match rng.pick(12) {
        0 => "0".to_string(),
        1 => "1".to_string(),
        2 => "2".to_string(),
        3 => "3".to_string(),
        4 => "5".to_string(),
        5 => "7".to_string(),
        6 => "9".to_string(),
        7 => "0.5".to_string(),
        8 => "2.5".to_string(),
        9 => "1.25".to_string(),
        10 => "-3".to_string(),
        _ => "--4".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    let op = match rng.pick(4) {
        0 => "+",
        1 => "-",
        2 => "*",
        _ => "/",
    };

    match rng.pick(6) {
        0 => gen_atome(rng),
        1 => format!("-({})", gen_expr(rng, depth - 1)),
        2..=3 => format!(
            "({}{op}{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        _ => format!(
            "{}{op}{}",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_finitude() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match evaluer(&expr) {
            Ok(v) => {
                // les atomes sont petits : un succès ne déborde jamais
                assert!(v.is_finite(), "résultat non fini pour {expr:?} : {v}");
                // déterminisme strict, au bit près
                assert_eq!(evaluer(&expr), Ok(v), "non déterministe : {expr:?}");
                seen_ok += 1;
            }
            Err(ErreurEval::DivisionParZero) => {
                // normal : le générateur produit des zéros
                seen_err += 1;
            }
            Err(e) => {
                // toute expression générée est bien formée : seul /0 est admis
                panic!("erreur inattendue : expr={expr:?} err={e}");
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 100, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune division par zéro vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_entrees_hostiles_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);

    // Soupe de caractères du jeu autorisé + intrus : l'évaluateur doit
    // répondre Ok ou une erreur de la taxonomie, jamais paniquer.
    let alphabet: &[char] = &[
        '0', '1', '2', '9', '+', '-', '*', '/', '(', ')', '.', ' ', 'a', ';', '=', 'e',
    ];

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..600 {
        budget(t0, max);

        let long = 1 + rng.pick(24) as usize;
        let expr: String = (0..long)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        match evaluer(&expr) {
            Ok(v) => assert!(!v.is_nan(), "NaN silencieux pour {expr:?}"),
            Err(
                ErreurEval::EntreeVide
                | ErreurEval::CaractereInvalide(_)
                | ErreurEval::DivisionParZero
                | ErreurEval::NombreInvalide(_),
            ) => {}
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // 800 demi-unités, parenthésage équilibré : profondeur ~10, pas 800.
    let expr = somme_balancee("0.5", 800);
    budget(t0, max);

    let v = evaluer(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(v, 400.0);
}
