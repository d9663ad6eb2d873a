//! Placeholder substitution for narrative templates.
//!
//! Syntax: `{name}` or `{name:spec}`, with `{{` and `}}` for literal braces.
//! A spec is `[[fill]align][sign][0][width][,|_][.precision][type]` with type
//! one of `f`, `e`, `g`, `%`, `d` (and upper-case `F`/`E`/`G`), following the
//! Python format mini-language that rule documents are written in.

use crate::error::{Result, ZoningError};

/// A value that can be substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateValue {
    Int(i64),
    Float(f64),
}

impl TemplateValue {
    fn as_f64(self) -> f64 {
        match self {
            TemplateValue::Int(i) => i as f64,
            TemplateValue::Float(v) => v,
        }
    }
}

fn render_error(msg: impl Into<String>) -> ZoningError {
    ZoningError::TemplateRender(msg.into())
}

/// Substitute every placeholder in `template` from `vars`.
pub fn render(template: &str, vars: &[(&str, TemplateValue)]) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let brace = &rest[pos..pos + 1];
        rest = &rest[pos + 1..];

        if brace == "}" {
            rest = rest
                .strip_prefix('}')
                .ok_or_else(|| render_error("single '}' encountered in template"))?;
            out.push('}');
            continue;
        }
        if let Some(after) = rest.strip_prefix('{') {
            out.push('{');
            rest = after;
            continue;
        }

        let end = rest
            .find('}')
            .ok_or_else(|| render_error("single '{' encountered in template"))?;
        let field = &rest[..end];
        rest = &rest[end + 1..];

        let (name, spec) = field.split_once(':').unwrap_or((field, ""));
        let value = vars
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| render_error(format!("unknown placeholder '{name}'")))?;
        out.push_str(&format_value(value, spec)?);
    }
    out.push_str(rest);
    Ok(out)
}

#[derive(Debug, PartialEq)]
struct FormatSpec {
    fill: char,
    align: Option<char>,
    sign: char,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: '-',
            width: 0,
            grouping: None,
            precision: None,
            kind: None,
        }
    }
}

fn parse_spec(spec: &str) -> Result<FormatSpec> {
    let unsupported = || render_error(format!("unsupported format spec '{spec}'"));
    let chars: Vec<char> = spec.chars().collect();
    let mut parsed = FormatSpec::default();
    let mut i = 0;

    let is_align = |c: char| matches!(c, '<' | '>' | '^' | '=');
    if chars.len() >= 2 && is_align(chars[1]) {
        parsed.fill = chars[0];
        parsed.align = Some(chars[1]);
        i = 2;
    } else if chars.first().copied().is_some_and(is_align) {
        parsed.align = Some(chars[0]);
        i = 1;
    }
    if let Some(&c) = chars.get(i).filter(|c| matches!(**c, '+' | '-' | ' ')) {
        parsed.sign = c;
        i += 1;
    }
    if chars.get(i) == Some(&'0') {
        if parsed.align.is_none() {
            parsed.fill = '0';
            parsed.align = Some('=');
        }
        i += 1;
    }
    let digits = |from: usize| chars[from..].iter().take_while(|c| c.is_ascii_digit()).count();
    let n = digits(i);
    if n > 0 {
        parsed.width = number(&chars[i..i + n]).ok_or_else(unsupported)?;
        i += n;
    }
    if let Some(&c) = chars.get(i).filter(|c| matches!(**c, ',' | '_')) {
        parsed.grouping = Some(c);
        i += 1;
    }
    if chars.get(i) == Some(&'.') {
        let n = digits(i + 1);
        if n == 0 {
            return Err(render_error(format!("format spec '{spec}' is missing a precision")));
        }
        parsed.precision = Some(number(&chars[i + 1..i + 1 + n]).ok_or_else(unsupported)?);
        i += 1 + n;
    }
    if let Some(&c) = chars.get(i) {
        if !matches!(c, 'f' | 'F' | 'e' | 'E' | 'g' | 'G' | '%' | 'd') {
            return Err(unsupported());
        }
        parsed.kind = Some(c);
        i += 1;
    }
    if i != chars.len() {
        return Err(unsupported());
    }
    Ok(parsed)
}

fn number(digits: &[char]) -> Option<usize> {
    digits.iter().collect::<String>().parse().ok()
}

fn format_value(value: TemplateValue, spec: &str) -> Result<String> {
    let spec = parse_spec(spec)?;
    let (negative, body) = match (spec.kind, value) {
        (None | Some('d'), TemplateValue::Int(i)) => {
            if spec.precision.is_some() {
                return Err(render_error("precision not allowed in integer format"));
            }
            (i < 0, i.unsigned_abs().to_string())
        }
        (Some('d'), TemplateValue::Float(_)) => {
            return Err(render_error("format code 'd' used on a float"));
        }
        (kind, v) => {
            let x = v.as_f64();
            (x.is_sign_negative() && !x.is_nan(), float_body(x.abs(), kind, spec.precision)?)
        }
    };

    let body = match spec.grouping {
        Some(sep) => group_digits(&body, sep),
        None => body,
    };
    let sign = match (negative, spec.sign) {
        (true, _) => "-",
        (false, '+') => "+",
        (false, ' ') => " ",
        _ => "",
    };
    Ok(pad(sign, &body, &spec))
}

/// Text of a non-negative float for the given presentation type.
fn float_body(x: f64, kind: Option<char>, precision: Option<usize>) -> Result<String> {
    if !x.is_finite() {
        let text = if x.is_nan() { "nan" } else { "inf" };
        return Ok(match kind {
            Some('F' | 'E' | 'G') => text.to_uppercase(),
            Some('%') => format!("{text}%"),
            _ => text.to_string(),
        });
    }
    let body = match kind {
        Some('f' | 'F') => format!("{:.*}", precision.unwrap_or(6), x),
        Some('e') => scientific(x, precision.unwrap_or(6)),
        Some('E') => scientific(x, precision.unwrap_or(6)).to_uppercase(),
        Some('g') => general(x, precision.unwrap_or(6), false),
        Some('G') => general(x, precision.unwrap_or(6), false).to_uppercase(),
        Some('%') => format!("{:.*}%", precision.unwrap_or(6), x * 100.0),
        None => match precision {
            Some(p) => general(x, p, true),
            None => shortest(x),
        },
        Some(other) => return Err(render_error(format!("unsupported format code '{other}'"))),
    };
    Ok(body)
}

/// Significant-digit form: fixed notation for moderate exponents, scientific
/// otherwise, trailing zeros removed. With `keep_point` (no presentation type)
/// fixed output keeps at least one decimal and scientific starts one exponent
/// earlier.
fn general(x: f64, precision: usize, keep_point: bool) -> String {
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, x);
    let exp = exponent(&sci);
    let limit = if keep_point { p as i32 - 1 } else { p as i32 };

    if (-4..limit).contains(&exp) {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        let mut s = trim_fraction(format!("{x:.decimals$}"));
        if keep_point && !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        let mantissa = sci.split_once('e').map_or(sci.as_str(), |(m, _)| m);
        with_exponent(&trim_fraction(mantissa.to_string()), exp)
    }
}

/// Shortest round-trip text: fixed notation between 1e-4 and 1e16, with a
/// trailing `.0` for integral values, scientific outside that range.
fn shortest(x: f64) -> String {
    let sci = format!("{x:e}");
    let exp = exponent(&sci);
    if (-4..16).contains(&exp) {
        let s = x.to_string();
        if s.contains('.') {
            s
        } else {
            format!("{s}.0")
        }
    } else {
        let mantissa = sci.split_once('e').map_or(sci.as_str(), |(m, _)| m);
        with_exponent(mantissa, exp)
    }
}

/// Mantissa/exponent form with a signed, two-digit-minimum exponent.
fn scientific(x: f64, precision: usize) -> String {
    let sci = format!("{x:.precision$e}");
    let exp = exponent(&sci);
    let mantissa = sci.split_once('e').map_or(sci.as_str(), |(m, _)| m);
    with_exponent(mantissa, exp)
}

fn exponent(sci: &str) -> i32 {
    sci.split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0)
}

fn with_exponent(mantissa: &str, exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

fn trim_fraction(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Insert `sep` every three digits of the leading integer part.
fn group_digits(body: &str, sep: char) -> String {
    let int_len = body.chars().take_while(char::is_ascii_digit).count();
    let (int_part, rest) = body.split_at(int_len);
    let mut out = String::with_capacity(body.len() + int_len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out.push_str(rest);
    out
}

fn pad(sign: &str, body: &str, spec: &FormatSpec) -> String {
    let len = sign.chars().count() + body.chars().count();
    if spec.width <= len {
        return format!("{sign}{body}");
    }
    let fill = |n: usize| spec.fill.to_string().repeat(n);
    let gap = spec.width - len;
    match spec.align.unwrap_or('>') {
        '<' => format!("{sign}{body}{}", fill(gap)),
        '^' => format!("{}{sign}{body}{}", fill(gap / 2), fill(gap - gap / 2)),
        '=' => format!("{sign}{}{body}", fill(gap)),
        _ => format!("{}{sign}{body}", fill(gap)),
    }
}
