//! Decoding of HTML-entity-encoded text delivered by the question source.

use quick_xml::escape::unescape_with;

/// Named entities the trivia feed emits, beyond numeric references.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("quot", "\""),
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("shy", "\u{ad}"),
    ("hellip", "…"),
    ("ndash", "–"),
    ("mdash", "—"),
    ("lsquo", "‘"),
    ("rsquo", "’"),
    ("sbquo", "‚"),
    ("ldquo", "“"),
    ("rdquo", "”"),
    ("bdquo", "„"),
    ("laquo", "«"),
    ("raquo", "»"),
    ("prime", "′"),
    ("Prime", "″"),
    ("bull", "•"),
    ("middot", "·"),
    ("deg", "°"),
    ("copy", "©"),
    ("reg", "®"),
    ("trade", "™"),
    ("times", "×"),
    ("divide", "÷"),
    ("plusmn", "±"),
    ("micro", "µ"),
    ("sup2", "²"),
    ("sup3", "³"),
    ("frac12", "½"),
    ("frac14", "¼"),
    ("frac34", "¾"),
    ("pound", "£"),
    ("euro", "€"),
    ("yen", "¥"),
    ("cent", "¢"),
    ("sect", "§"),
    ("para", "¶"),
    ("iexcl", "¡"),
    ("iquest", "¿"),
    ("pi", "π"),
    ("Pi", "Π"),
    ("aacute", "á"),
    ("Aacute", "Á"),
    ("agrave", "à"),
    ("Agrave", "À"),
    ("acirc", "â"),
    ("Acirc", "Â"),
    ("atilde", "ã"),
    ("Atilde", "Ã"),
    ("auml", "ä"),
    ("Auml", "Ä"),
    ("aring", "å"),
    ("Aring", "Å"),
    ("aelig", "æ"),
    ("AElig", "Æ"),
    ("ccedil", "ç"),
    ("Ccedil", "Ç"),
    ("eacute", "é"),
    ("Eacute", "É"),
    ("egrave", "è"),
    ("Egrave", "È"),
    ("ecirc", "ê"),
    ("Ecirc", "Ê"),
    ("euml", "ë"),
    ("Euml", "Ë"),
    ("iacute", "í"),
    ("Iacute", "Í"),
    ("igrave", "ì"),
    ("Igrave", "Ì"),
    ("icirc", "î"),
    ("Icirc", "Î"),
    ("iuml", "ï"),
    ("Iuml", "Ï"),
    ("ntilde", "ñ"),
    ("Ntilde", "Ñ"),
    ("oacute", "ó"),
    ("Oacute", "Ó"),
    ("ograve", "ò"),
    ("Ograve", "Ò"),
    ("ocirc", "ô"),
    ("Ocirc", "Ô"),
    ("otilde", "õ"),
    ("Otilde", "Õ"),
    ("ouml", "ö"),
    ("Ouml", "Ö"),
    ("oslash", "ø"),
    ("Oslash", "Ø"),
    ("oelig", "œ"),
    ("OElig", "Œ"),
    ("scaron", "š"),
    ("Scaron", "Š"),
    ("szlig", "ß"),
    ("uacute", "ú"),
    ("Uacute", "Ú"),
    ("ugrave", "ù"),
    ("Ugrave", "Ù"),
    ("ucirc", "û"),
    ("Ucirc", "Û"),
    ("uuml", "ü"),
    ("Uuml", "Ü"),
    ("yacute", "ý"),
    ("Yacute", "Ý"),
    ("yuml", "ÿ"),
    ("zcaron", "ž"),
    ("Zcaron", "Ž"),
    ("lrm", "\u{200e}"),
    ("rlm", "\u{200f}"),
    ("alpha", "α"),
    ("Alpha", "Α"),
    ("beta", "β"),
    ("Beta", "Β"),
    ("gamma", "γ"),
    ("Gamma", "Γ"),
    ("delta", "δ"),
    ("Delta", "Δ"),
    ("epsilon", "ε"),
    ("Epsilon", "Ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("Theta", "Θ"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("Lambda", "Λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("omicron", "ο"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("Sigma", "Σ"),
    ("tau", "τ"),
    ("upsilon", "υ"),
    ("phi", "φ"),
    ("Phi", "Φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("Psi", "Ψ"),
    ("omega", "ω"),
    ("Omega", "Ω"),
    ("larr", "←"),
    ("rarr", "→"),
    ("uarr", "↑"),
    ("darr", "↓"),
    ("harr", "↔"),
    ("rArr", "⇒"),
    ("hArr", "⇔"),
    ("hearts", "♥"),
    ("diams", "♦"),
    ("clubs", "♣"),
    ("spades", "♠"),
    ("infin", "∞"),
    ("ne", "≠"),
    ("le", "≤"),
    ("ge", "≥"),
    ("asymp", "≈"),
    ("minus", "−"),
    ("radic", "√"),
    ("sum", "∑"),
    ("prod", "∏"),
    ("part", "∂"),
    ("int", "∫"),
    ("dagger", "†"),
    ("Dagger", "‡"),
    ("permil", "‰"),
    ("ordm", "º"),
    ("ordf", "ª"),
    ("eth", "ð"),
    ("ETH", "Ð"),
    ("thorn", "þ"),
    ("THORN", "Þ"),
];

/// Longest entity name we look for between `&` and `;`.
const MAX_REFERENCE_LEN: usize = 32;

fn resolve_named(entity: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == entity)
        .map(|(_, value)| *value)
}

/// Decode HTML entities (`&quot;`, `&#039;`, `&eacute;`, ...) into plain text.
///
/// Each reference is resolved on its own. A reference we cannot resolve, or a
/// bare `&`, is kept literally while the rest of the text is still decoded.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(len) = reference_len(tail) else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };
        let reference = &tail[..len];
        match unescape_with(reference, resolve_named) {
            Ok(decoded) => out.push_str(&decoded),
            Err(err) => {
                tracing::warn!(error = %err, reference, "leaving unknown entity as-is");
                out.push_str(reference);
            }
        }
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}

/// Byte length of the `&name;` reference at the start of `text`, delimiters included.
fn reference_len(text: &str) -> Option<usize> {
    let body = text.get(1..)?;
    let end = body.find(|c: char| c == ';' || c == '&' || c.is_whitespace())?;
    let terminated = body[end..].starts_with(';');
    (terminated && end > 0 && end <= MAX_REFERENCE_LEN).then_some(end + 2)
}
