//! Parser for IPPcode18 tokens → instructions.
//!
//! The parser classifies operands but does not validate them. Malformed
//! variables, literals and unknown opcodes are passed through so that
//! static verification reports them with its own error codes.

use crate::error::AsmError;
use crate::lexer::{strip_comment, Token};
use ippcode_common::{FrameKind, Instruction, Opcode, Operand, OperandKind, Slot};

/// The language header, compared case-insensitively with whitespace removed.
pub(crate) const HEADER: &str = ".ippcode18";

/// Whether `line` is the `.IPPcode18` header line.
pub(crate) fn is_header(line: &str) -> bool {
    let compact: String = strip_comment(line)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact.eq_ignore_ascii_case(HEADER)
}

/// Parse the tokens of one line into an instruction at `position`.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
    position: u64,
) -> Result<Option<Instruction>, AsmError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic = match first {
        Token::Word(word) => word.as_str(),
        Token::Prefixed { .. } => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: first.text(),
            })
        }
    };

    // Unknown opcodes have no signature; their operands are classified
    // without slot information.
    let signature = mnemonic
        .parse::<Opcode>()
        .map(|op| op.signature())
        .unwrap_or(&[]);

    let operands = args
        .iter()
        .enumerate()
        .map(|(i, token)| classify(token, signature.get(i).copied()))
        .collect();

    Ok(Some(Instruction::new(position, mnemonic, operands)))
}

/// Classify one operand token.
///
/// `GF@`/`LF@`/`TF@` words are variables; `int@`/`bool@`/`string@` words
/// are literals of that kind. A bare word in a label or type slot takes
/// that kind; any other word becomes a label for verification to reject.
fn classify(token: &Token, slot: Option<Slot>) -> Operand {
    match token {
        Token::Prefixed { prefix, body } => {
            if is_frame_prefix(prefix) {
                return Operand::var(token.text());
            }
            match prefix.parse::<OperandKind>() {
                Ok(kind @ (OperandKind::Int | OperandKind::Bool | OperandKind::String)) => {
                    Operand::new(kind, body.clone())
                }
                _ => Operand::label(token.text()),
            }
        }
        Token::Word(word) => match slot {
            Some(Slot::Type) => Operand::type_name(word.clone()),
            _ => Operand::label(word.clone()),
        },
    }
}

fn is_frame_prefix(prefix: &str) -> bool {
    [FrameKind::Global, FrameKind::Local, FrameKind::Temporary]
        .iter()
        .any(|frame| frame.prefix() == prefix)
}
