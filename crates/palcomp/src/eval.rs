// this_file: crates/palcomp/src/eval.rs

//! The palette expression language: single-letter registers, doubles, and
//! five precedence levels from `^` down to the `,` sequence operator.
//!
//! Parsing happens in two stages like a tiny shunting-yard cousin: a flat
//! tokenizer (recursing only into parentheses), then an in-place
//! precedence pass that rewrites `a op b` triples into nested groups,
//! right-to-left for the `=` level. Evaluation walks the groups once per
//! palette entry.

use thiserror::Error;

use crate::color::ColorEngine;
use crate::palette::Palette;

/// Registers the language knows. `s` is accepted as an alias for `c`.
pub const REGS: &str = "bcghlrsxyz";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct EvalError(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Reg(char),
    Imm(f64),
    Op(char),
    Grp(Vec<Token>),
}

fn err_at(expr: &str, pos: usize, reason: &str) -> EvalError {
    EvalError(format!(
        "Evaluation of expression failed at\n\t{expr}\n\t{:pos$}^\n{reason}",
        ""
    ))
}

/// Tokenize a whole expression into a precedence-grouped token tree.
pub fn parse(expr: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = expr.as_bytes();
    let mut pos = 0;
    let tokens = parse_inner(expr, bytes, &mut pos)?;
    if pos != bytes.len() {
        return Err(err_at(expr, pos, "Unbalanced closing parenthesis"));
    }
    Ok(tokens)
}

fn parse_inner(expr: &str, bytes: &[u8], pos: &mut usize) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut last_was_operand = false;

    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if *pos >= bytes.len() || bytes[*pos] == b')' {
            break;
        }
        let c = bytes[*pos] as char;
        if "*/+,-=^".contains(c) {
            if !last_was_operand {
                return Err(err_at(
                    expr,
                    *pos,
                    "Cannot use operator here (note: no unary operators supported)",
                ));
            }
            tokens.push(Token::Op(c));
            last_was_operand = false;
            *pos += 1;
        } else if REGS.contains(c) {
            if last_was_operand {
                return Err(err_at(expr, *pos, "Cannot use identifier here"));
            }
            tokens.push(Token::Reg(if c == 's' { 'c' } else { c }));
            last_was_operand = true;
            *pos += 1;
        } else if c == '(' {
            if last_was_operand {
                return Err(err_at(expr, *pos, "Cannot use opening parenthesis here"));
            }
            *pos += 1;
            let inner = parse_inner(expr, bytes, pos)?;
            if bytes.get(*pos) != Some(&b')') {
                return Err(err_at(expr, *pos, "Expected closing parenthesis"));
            }
            *pos += 1;
            tokens.push(Token::Grp(inner));
            last_was_operand = true;
        } else if let Some((value, len)) = scan_number(&expr[*pos..]) {
            if last_was_operand {
                return Err(err_at(expr, *pos, "Cannot use immediate value here"));
            }
            tokens.push(Token::Imm(value));
            last_was_operand = true;
            *pos += len;
        } else {
            return Err(err_at(expr, *pos, "Unexpected character"));
        }
    }

    if tokens.is_empty() {
        return Err(err_at(expr, *pos, "No tokens were parsed -- empty parenthesis?"));
    }
    if matches!(tokens.last(), Some(Token::Op(_))) {
        return Err(err_at(expr, *pos, "Last token cannot be an operator"));
    }
    group_by_precedence(&mut tokens);
    Ok(tokens)
}

/// Longest numeric literal prefix a conventional decimal parser accepts.
/// Signs are operators here, so literals start with a digit or a dot.
fn scan_number(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let mut len = 0;
    while len < bytes.len() && (bytes[len].is_ascii_digit() || bytes[len] == b'.') {
        len += 1;
    }
    if len == 0 {
        return None;
    }
    if bytes.get(len).is_some_and(|&b| b == b'e' || b == b'E') {
        let mut exp = len + 1;
        if bytes.get(exp).is_some_and(|&b| b == b'+' || b == b'-') {
            exp += 1;
        }
        let digits = bytes[exp..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            len = exp + digits;
        }
    }
    s[..len].parse().ok().map(|v| (v, len))
}

/// Rewrite flat `a op b` runs into nested triples, tightest operator
/// first; `=` groups right-to-left via the reverse trick.
fn group_by_precedence(tokens: &mut Vec<Token>) {
    const LEVELS: [&str; 5] = ["^", "*/", "+-", "=", ","];
    for level in LEVELS {
        let right_assoc = level == "=";
        if right_assoc {
            tokens.reverse();
        }
        let mut i = 1;
        while i + 1 < tokens.len().max(1) {
            let is_level_op = match &tokens[i] {
                Token::Op(op) => level.contains(*op),
                _ => false,
            };
            if !is_level_op {
                i += 1;
                continue;
            }
            let mut triple: Vec<Token> = tokens.drain(i - 1..=i + 1).collect();
            if right_assoc {
                triple.reverse();
            }
            tokens.insert(i - 1, Token::Grp(triple));
            // Redo at the same position.
        }
        if right_assoc {
            tokens.reverse();
        }
    }
}

/// Evaluate a parsed expression against one palette entry.
pub fn eval_entry(
    tokens: &[Token],
    pal: &mut Palette,
    engine: &ColorEngine,
    idx: usize,
) -> Result<Token, EvalError> {
    if tokens.len() == 1 {
        return match &tokens[0] {
            Token::Grp(inner) => eval_entry(inner, pal, engine, idx),
            t => Ok(t.clone()),
        };
    }
    if tokens.len() != 3 {
        return Err(EvalError(format!(
            "Expected a group with 3 tokens: {tokens:?}"
        )));
    }
    let &Token::Op(op) = &tokens[1] else {
        return Err(EvalError(format!(
            "Expected middle token to be an operator: {tokens:?}"
        )));
    };

    // Sequence evaluation order matters: left before right.
    let (lhs, lhv) = eval_arg(&tokens[0], pal, engine, idx)?;
    let (rhs, rhv) = eval_arg(&tokens[2], pal, engine, idx)?;

    match op {
        '+' => return Ok(Token::Imm(lhv + rhv)),
        '-' => return Ok(Token::Imm(lhv - rhv)),
        '*' => return Ok(Token::Imm(lhv * rhv)),
        '/' => return Ok(Token::Imm(lhv / rhv)),
        '^' => return Ok(Token::Imm(lhv.max(0.0).powf(rhv))),
        ',' => return Ok(rhs),
        '=' => {}
        _ => return Err(EvalError(format!("Unhandled operator {op:?}"))),
    }

    let Token::Reg(reg) = lhs else {
        return Err(EvalError(
            "Left-hand side of an assignment needs to be a register".to_string(),
        ));
    };
    write_register(pal, engine, idx, reg, rhv)?;
    Ok(lhs)
}

fn eval_arg(
    token: &Token,
    pal: &mut Palette,
    engine: &ColorEngine,
    idx: usize,
) -> Result<(Token, f64), EvalError> {
    let resolved = match token {
        Token::Grp(inner) => eval_entry(inner, pal, engine, idx)?,
        t => t.clone(),
    };
    let value = match &resolved {
        Token::Imm(v) => *v,
        Token::Reg(r) => read_register(pal, idx, *r)?,
        _ => return Err(EvalError(format!("Unhandled subexpression: {resolved:?}"))),
    };
    Ok((resolved, value))
}

fn read_register(pal: &Palette, idx: usize, reg: char) -> Result<f64, EvalError> {
    Ok(match reg {
        'r' => pal.ra[idx].r as f64,
        'g' => pal.ra[idx].g as f64,
        'b' => pal.ra[idx].b as f64,
        'l' => pal.la[idx].l,
        'c' => pal.la[idx].c,
        'h' => pal.la[idx].h,
        'x' => pal.x,
        'y' => pal.y,
        'z' => pal.z,
        _ => return Err(EvalError(format!("Illegal register {reg:?}"))),
    })
}

fn write_register(
    pal: &mut Palette,
    engine: &ColorEngine,
    idx: usize,
    reg: char,
    value: f64,
) -> Result<(), EvalError> {
    let mut mod_rgb = false;
    let mut mod_lch = false;
    match reg {
        'r' => {
            pal.ra[idx].r = value as u8;
            mod_rgb = true;
        }
        'g' => {
            pal.ra[idx].g = value as u8;
            mod_rgb = true;
        }
        'b' => {
            pal.ra[idx].b = value as u8;
            mod_rgb = true;
        }
        'l' => {
            pal.la[idx].l = value;
            mod_lch = true;
        }
        'c' => {
            pal.la[idx].c = value;
            mod_lch = true;
        }
        'h' => {
            pal.la[idx].h = value.rem_euclid(360.0);
            mod_lch = true;
        }
        'x' => pal.x = value,
        'y' => pal.y = value,
        'z' => pal.z = value,
        _ => return Err(EvalError(format!("Illegal register {reg:?}"))),
    }
    if mod_lch {
        pal.sync_from_lch(engine);
    }
    if mod_rgb {
        pal.sync_from_rgb(engine);
    }
    Ok(())
}

/// Parse and run an expression over the selected entries (all of them
/// when `indices` is `None`).
pub fn run(
    expr: &str,
    pal: &mut Palette,
    engine: &ColorEngine,
    indices: Option<&[usize]>,
) -> Result<(), EvalError> {
    let tokens = parse(expr)?;
    log::debug!("expr parsed as: {tokens:?}");
    if pal.la.len() != pal.ra.len() {
        return Err(EvalError("palette sides are out of sync".to_string()));
    }
    match indices {
        None => {
            for idx in 0..pal.la.len() {
                eval_entry(&tokens, pal, engine, idx)?;
            }
        }
        Some(picks) => {
            for &idx in picks {
                if idx < pal.la.len() {
                    eval_entry(&tokens, pal, engine, idx)?;
                }
            }
        }
    }
    Ok(())
}

/// Parse the `a,b-c,...` index list of an `eval@` scope selector.
pub fn parse_range(s: &str) -> Vec<usize> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((a, b)) => {
                let (Ok(a), Ok(b)) = (a.trim().parse::<usize>(), b.trim().parse::<usize>()) else {
                    log::warn!("failed parsing range {part:?}");
                    continue;
                };
                out.extend(a..=b);
            }
            None => match part.parse::<usize>() {
                Ok(v) => out.push(v),
                Err(_) => log::warn!("failed parsing range {part:?}"),
            },
        }
    }
    out
}
