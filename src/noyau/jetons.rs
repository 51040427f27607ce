// src/noyau/jetons.rs

use super::erreur::ErreurEval;

#[derive(Clone, Debug, PartialEq)]
pub enum Jeton {
    Nombre(f64),

    Plus,
    Moins,
    Etoile,
    Barre,

    ParG,
    ParD,
}

/// Tokenize une expression du pavé en jetons.
///
/// Prétraitement (dans cet ordre, c'est le contrat) :
/// 1. Les espaces sont entièrement retirés.
/// 2. Chaîne vide => `EntreeVide`.
/// 3. Tout caractère hors `[0-9 + - * / ( ) .]` => `CaractereInvalide`,
///    avant toute lecture de structure.
///
/// Un nombre est une suite maximale de chiffres et de points, validée par
/// `str::parse::<f64>` : `12`, `3.5`, `.5`, `5.` passent ; `1.2.3` et `.`
/// échouent en `NombreInvalide`.
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurEval> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();

    if chars.is_empty() {
        return Err(ErreurEval::EntreeVide);
    }

    let mut out = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '(' => {
                out.push(Jeton::ParG);
                i += 1;
                continue;
            }
            ')' => {
                out.push(Jeton::ParD);
                i += 1;
                continue;
            }
            '+' => {
                out.push(Jeton::Plus);
                i += 1;
                continue;
            }
            '-' => {
                out.push(Jeton::Moins);
                i += 1;
                continue;
            }
            '*' => {
                out.push(Jeton::Etoile);
                i += 1;
                continue;
            }
            '/' => {
                out.push(Jeton::Barre);
                i += 1;
                continue;
            }
            _ => {}
        }

        // Nombre : chiffres + points, lecture maximale.
        if c.is_ascii_digit() || c == '.' {
            let debut = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let texte: String = chars[debut..i].iter().collect();

            let v: f64 = texte
                .parse()
                .map_err(|_| ErreurEval::NombreInvalide(texte.clone()))?;
            out.push(Jeton::Nombre(v));
            continue;
        }

        return Err(ErreurEval::CaractereInvalide(c));
    }

    Ok(out)
}

/// Rend une suite de jetons en texte (messages d'erreur, debug).
pub fn format_jetons(jetons: &[Jeton]) -> String {
    let mut out = String::new();
    for j in jetons {
        match j {
            Jeton::Nombre(v) => out.push_str(&format!("{v}")),
            Jeton::Plus => out.push('+'),
            Jeton::Moins => out.push('-'),
            Jeton::Etoile => out.push('*'),
            Jeton::Barre => out.push('/'),
            Jeton::ParG => out.push('('),
            Jeton::ParD => out.push(')'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_jetons, tokenize, ErreurEval, Jeton};

    #[test]
    fn jetons_de_base() {
        let jetons = tokenize("5+3*2").unwrap();
        assert_eq!(
            jetons,
            vec![
                Jeton::Nombre(5.0),
                Jeton::Plus,
                Jeton::Nombre(3.0),
                Jeton::Etoile,
                Jeton::Nombre(2.0),
            ]
        );
    }

    #[test]
    fn espaces_retires_avant_lecture() {
        // " 1 2 " devient "12" : un seul nombre, pas deux.
        let jetons = tokenize(" 1 2 ").unwrap();
        assert_eq!(jetons, vec![Jeton::Nombre(12.0)]);
    }

    #[test]
    fn entree_vide() {
        assert_eq!(tokenize(""), Err(ErreurEval::EntreeVide));
        assert_eq!(tokenize("   "), Err(ErreurEval::EntreeVide));
    }

    #[test]
    fn caractere_interdit() {
        assert_eq!(tokenize("5+a"), Err(ErreurEval::CaractereInvalide('a')));
        assert_eq!(tokenize("1;2"), Err(ErreurEval::CaractereInvalide(';')));
        assert_eq!(tokenize("[1]"), Err(ErreurEval::CaractereInvalide('[')));
    }

    #[test]
    fn decimales() {
        assert_eq!(tokenize("3.5").unwrap(), vec![Jeton::Nombre(3.5)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Jeton::Nombre(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Jeton::Nombre(5.0)]);
    }

    #[test]
    fn decimale_mal_formee() {
        assert_eq!(
            tokenize("1.2.3"),
            Err(ErreurEval::NombreInvalide("1.2.3".into()))
        );
        assert_eq!(tokenize("."), Err(ErreurEval::NombreInvalide(".".into())));
    }

    #[test]
    fn format_rend_le_texte() {
        let jetons = tokenize("(1+2)*3").unwrap();
        assert_eq!(format_jetons(&jetons), "(1+2)*3");
    }
}
