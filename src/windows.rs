use std::borrow::Cow;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{self, satisfy},
    combinator::{recognize, value},
    multi::count,
    sequence::{pair, terminated},
    IResult, Parser,
};

use crate::{Root, RootKind};

pub const DIR_SEPARATOR: char = '\\';
pub const ALT_DIR_SEPARATOR: char = '/';
pub const PATH_LIST_SEPARATOR: char = ';';

const VERBATIM_PREFIX: &str = r"\\?\";
const DEVICE_PREFIX: &str = r"\\.\";
const UNC_PREFIX: &str = r"\\";
const UNC_MARKER: &str = r"UNC\";

pub fn is_windows_verbatim_sep(c: char) -> bool {
    c == DIR_SEPARATOR
}

pub fn is_windows_sep(c: char) -> bool {
    c == DIR_SEPARATOR || c == ALT_DIR_SEPARATOR
}

#[inline]
pub fn is_separator(c: char, verbatim: bool) -> bool {
    if verbatim {
        is_windows_verbatim_sep(c)
    } else {
        is_windows_sep(c)
    }
}

#[inline]
fn is_drive_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Parses a leading `X:` and yields the drive letter.
pub fn parse_drive(path: &str) -> IResult<&str, char> {
    terminated(satisfy(is_drive_letter), complete::char(':')).parse(path)
}

/// Parses `\\?\` or `\\.\`, yielding `true` for the verbatim form.
fn parse_dos_device_prefix(path: &str) -> IResult<&str, bool> {
    alt((
        value(true, tag(VERBATIM_PREFIX)),
        value(false, tag(DEVICE_PREFIX)),
    ))
    .parse(path)
}

/// Number of bytes of `input` up to and including its `n`th separator, or the
/// whole input when fewer separators are present.
fn span_through_separators(input: &str, n: usize, verbatim: bool) -> usize {
    let sep = move |c: char| is_separator(c, verbatim);
    let spanned: IResult<&str, &str> =
        recognize(count(pair(take_till(sep), satisfy(sep)), n)).parse(input);
    match spanned {
        Ok((_, span)) => span.len(),
        Err(_) => input.len(),
    }
}

pub fn classify_windows_root(path: &str) -> Root {
    // "C:" or "C:\"
    if let Ok((rest, _)) = parse_drive(path) {
        return match rest.chars().next() {
            Some(c) if is_windows_sep(c) => Root::new(RootKind::DriveAbsolute, 3),
            _ => Root::new(RootKind::DriveRelative, 2),
        };
    }

    // "\\?\..." or "\\.\..."
    if let Ok((rest, verbatim)) = parse_dos_device_prefix(path) {
        let prefix_len = path.len() - rest.len();
        let unc: IResult<&str, &str> = tag(UNC_MARKER).parse(rest);
        return match unc {
            // "\\?\UNC\server\share\"
            Ok((share_path, _)) => {
                let len = prefix_len
                    + UNC_MARKER.len()
                    + span_through_separators(share_path, 2, verbatim);
                let kind = if verbatim {
                    RootKind::VerbatimUnc
                } else {
                    RootKind::Device
                };
                Root::new(kind, len)
            }
            // "\\?\C:\" or "\\.\device\"
            Err(_) => {
                let len = prefix_len + span_through_separators(rest, 1, verbatim);
                let kind = if verbatim {
                    RootKind::Verbatim
                } else {
                    RootKind::Device
                };
                Root::new(kind, len)
            }
        };
    }

    // "\\server\share\"
    let unc: IResult<&str, &str> = tag(UNC_PREFIX).parse(path);
    if let Ok((share_path, _)) = unc {
        let len = UNC_PREFIX.len() + span_through_separators(share_path, 2, false);
        return Root::new(RootKind::Unc, len);
    }

    // "\foo" or "foo"
    match path.chars().next() {
        Some(c) if is_windows_sep(c) => Root::new(RootKind::Separator, 1),
        _ => Root::new(RootKind::None, 0),
    }
}

pub fn is_verbatim(path: &str) -> bool {
    path.starts_with(VERBATIM_PREFIX)
}

pub fn is_unc(path: &str) -> bool {
    path.starts_with(UNC_PREFIX)
}

fn is_drive_absolute(path: &str) -> bool {
    matches!(parse_drive(path), Ok((rest, _)) if rest.starts_with(is_windows_sep))
}

pub fn is_absolute(path: &str) -> bool {
    is_unc(path) || is_drive_absolute(path)
}

/// A path is fully qualified when it names a drive root, or begins with `/`,
/// `\\` or `\?`. `C:foo` and `\foo` depend on ambient drive state.
pub fn is_fully_qualified(path: &str) -> bool {
    let bytes = path.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    if parse_drive(path).is_ok() {
        return is_drive_absolute(path);
    }
    bytes[0] == b'/' || (bytes[0] == b'\\' && (bytes[1] == b'\\' || bytes[1] == b'?'))
}

pub fn is_normalized(path: &str) -> bool {
    if is_verbatim(path) {
        return true;
    }
    let bytes = path.as_bytes();
    if bytes.contains(&(ALT_DIR_SEPARATOR as u8)) {
        return false;
    }
    // a doubled separator is only allowed as the leading UNC pair
    !bytes
        .windows(2)
        .skip(1)
        .any(|w| w[0] == DIR_SEPARATOR as u8 && w[1] == DIR_SEPARATOR as u8)
}

/// Rewrites `/` to `\` and collapses separator runs. The first byte is
/// emitted on its own so a leading `\\` survives.
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len());
    let mut rest = path;
    if let Some(first) = rest.chars().next().filter(|c| is_windows_sep(*c)) {
        normalized.push(DIR_SEPARATOR);
        rest = &rest[first.len_utf8()..];
    }

    let mut skip_sep = false;
    for c in rest.chars() {
        if !is_windows_sep(c) {
            normalized.push(c);
            skip_sep = false;
        } else if !skip_sep {
            normalized.push(DIR_SEPARATOR);
            skip_sep = true;
        }
    }
    Cow::Owned(normalized)
}

pub fn is_valid_path_char(c: char) -> bool {
    c > '\u{1f}' && c != '|'
}

pub fn is_valid_file_name_char(c: char) -> bool {
    c > '\u{1f}' && !matches!(c, '"' | '*' | '/' | ':' | '<' | '>' | '?' | '\\' | '|')
}
