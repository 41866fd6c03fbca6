use std::borrow::Cow;

use ::url::{Host, Url};
use percent_encoding::{percent_encode, AsciiSet, CONTROLS};

use crate::{windows::parse_drive, PathGrammar, RootKind};

const URL_FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');
const URL_PATH: &AsciiSet = &URL_FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');
const URL_PATH_SEGMENT: &AsciiSet = &URL_PATH.add(b'/').add(b'%');

#[derive(thiserror::Error, Debug)]
pub enum PathToUrlError {
    #[error(transparent)]
    UrlParseError(#[from] ::url::ParseError),
    #[error("PathNotAbsoluteError {{ path = {path} }}")]
    PathNotAbsoluteError { path: Cow<'static, str> },
    #[error("NotSupportedPrefixError {{ path = {path}, prefix = {prefix} }}")]
    NotSupportedPrefixError {
        path: Cow<'static, str>,
        prefix: Cow<'static, str>,
    },
}

/// Where the path part of the URL starts: an optional host, then a leading
/// segment such as `C:` or the UNC share.
struct UrlRoot<'a> {
    host: Option<&'a str>,
    lead: Option<&'a str>,
}

fn unsupported(path: &str, prefix: &str) -> PathToUrlError {
    PathToUrlError::NotSupportedPrefixError {
        path: Cow::Owned(path.to_string()),
        prefix: Cow::Owned(prefix.to_string()),
    }
}

/// Splits a UNC body `server\share\` into its two names.
fn server_and_share(grammar: PathGrammar, body: &str, verbatim: bool) -> (&str, &str) {
    let mut names = body
        .split(|c: char| c.is_ascii() && grammar.is_dir_separator(c as u8, verbatim))
        .filter(|s| !s.is_empty());
    (names.next().unwrap_or(""), names.next().unwrap_or(""))
}

fn url_root<'a>(
    grammar: PathGrammar,
    path: &'a str,
    kind: RootKind,
    root: &'a str,
) -> Result<UrlRoot<'a>, PathToUrlError> {
    match kind {
        RootKind::Separator if grammar == PathGrammar::Posix => Ok(UrlRoot {
            host: None,
            lead: None,
        }),
        RootKind::DriveAbsolute => Ok(UrlRoot {
            host: None,
            lead: Some(&root[..2]),
        }),
        RootKind::Verbatim => match parse_drive(&root[4..]) {
            Ok(_) => Ok(UrlRoot {
                host: None,
                lead: Some(&root[4..6]),
            }),
            Err(_) => Err(unsupported(path, root)),
        },
        RootKind::Unc | RootKind::VerbatimUnc => {
            let body = if kind == RootKind::Unc {
                &root[2..]
            } else {
                &root[8..]
            };
            let (server, share) = server_and_share(grammar, body, kind.is_verbatim());
            if server.is_empty() {
                return Err(unsupported(path, root));
            }
            Ok(UrlRoot {
                host: Some(server),
                lead: (!share.is_empty()).then_some(share),
            })
        }
        _ => Err(unsupported(path, root)),
    }
}

impl PathGrammar {
    /// Converts a fully qualified path into a `file:` URL.
    pub fn to_file_url(self, path: &str) -> Result<Url, PathToUrlError> {
        if !self.is_fully_qualified(path) {
            return Err(PathToUrlError::PathNotAbsoluteError {
                path: Cow::Owned(path.to_string()),
            });
        }

        let root = self.classify_root(path);
        let root_str = &path[..root.len()];
        let UrlRoot { host, lead } = url_root(self, path, root.kind(), root_str)?;

        let mut serialization = String::from("file://");
        if let Some(host) = host {
            let host = Host::parse(host)?;
            serialization.push_str(&host.to_string());
        }
        if let Some(lead) = lead {
            serialization.push('/');
            serialization.extend(percent_encode(lead.as_bytes(), URL_PATH_SEGMENT));
        }

        let mut empty = true;
        for component in self.tokenize(path) {
            empty = false;
            serialization.push('/');
            serialization.extend(percent_encode(component.as_bytes(), URL_PATH_SEGMENT));
        }

        // "file:///" and "file:///C:/" keep their trailing slash
        if empty && (host.is_none() || lead.is_none()) {
            serialization.push('/');
        }

        Ok(Url::parse(&serialization)?)
    }
}
