use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

use super::{Config, Interface, Peer};

/// Structural failure while reading INI text. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: expected `key = value`, got {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: unknown section [{name}]")]
    UnknownSection { line: usize, name: String },

    #[error("line {line}: property before any section header")]
    PropertyOutsideSection { line: usize },

    #[error("line {line}: invalid integer for {key}: {source}")]
    InvalidNumber {
        line: usize,
        key: &'static str,
        source: ParseIntError,
    },
}

enum Section {
    Preamble,
    Interface,
    Peer,
}

impl Config {
    /// Reads an INI configuration from any byte stream. Reading stops
    /// at the first structural error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Config, Error> {
        let mut config = Config::default();
        let mut section = Section::Preamble;
        let mut pending_comment: Option<String> = None;

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let trimmed = line.trim();

            // blank lines separate blocks but do not reset the comment
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with(['#', ';']) {
                let text = trimmed.trim_start_matches(['#', ';']).trim();
                pending_comment = Some(text.to_string());
                continue;
            }

            let content = strip_inline_comment(trimmed);

            if let Some(rest) = content.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(ParseError::MalformedLine {
                        line: lineno,
                        text: content.to_string(),
                    }
                    .into());
                };

                section = match name {
                    "Interface" => {
                        // comments have no Interface-level field to land in
                        pending_comment = None;
                        Section::Interface
                    }
                    "Peer" => {
                        config.peers.add(Peer {
                            comment: pending_comment.take().unwrap_or_default(),
                            ..Peer::default()
                        });
                        Section::Peer
                    }
                    _ => {
                        return Err(ParseError::UnknownSection {
                            line: lineno,
                            name: name.to_string(),
                        }
                        .into());
                    }
                };

                continue;
            }

            let Some((key, value)) = content.split_once('=') else {
                return Err(ParseError::MalformedLine {
                    line: lineno,
                    text: content.to_string(),
                }
                .into());
            };
            let key = key.trim_end();
            let value = value.trim_start();

            match section {
                Section::Preamble => {
                    return Err(ParseError::PropertyOutsideSection { line: lineno }.into());
                }
                Section::Interface => config.interface.assign(key, value, lineno)?,
                Section::Peer => {
                    // every [Peer] header pushes a record first
                    if let Some(peer) = config.peers.last_mut() {
                        peer.assign(key, value, lineno)?;
                    }
                }
            }
        }

        Ok(config)
    }

    /// Thin wrapper over [`Config::from_reader`]: opens the file and
    /// delegates. Both open and parse failures surface to the caller.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let file = fs::File::open(path)?;
        Config::from_reader(file)
    }
}

impl Interface {
    fn assign(&mut self, key: &str, value: &str, line: usize) -> Result<(), ParseError> {
        match key {
            "PrivateKey" => self.private_key = value.to_string(),
            "Address" => self.address = value.to_string(),
            "ListenPort" => self.listen_port = parse_number("ListenPort", value, line)?,
            "DNS" => self.dns = split_list(value),
            "Table" => self.table = parse_number("Table", value, line)?,
            "MTU" => self.mtu = parse_number("MTU", value, line)?,
            "PreUp" => self.pre_up = value.to_string(),
            "PostUp" => self.post_up = value.to_string(),
            "PreDown" => self.pre_down = value.to_string(),
            "PostDown" => self.post_down = value.to_string(),
            _ => {} // unrecognized keys are skipped
        }

        Ok(())
    }
}

impl Peer {
    fn assign(&mut self, key: &str, value: &str, line: usize) -> Result<(), ParseError> {
        match key {
            "PublicKey" => self.public_key = value.to_string(),
            "PresharedKey" => self.preshared_key = value.to_string(),
            "AllowedIPs" => self.allowed_ips = value.to_string(),
            "Endpoint" => self.endpoint = value.to_string(),
            "PersistentKeepalive" => {
                self.persistent_keepalive = parse_number("PersistentKeepalive", value, line)?;
            }
            _ => {}
        }

        Ok(())
    }
}

// A `;` or `#` counts as a trailing comment only when preceded by
// whitespace; a glued marker ("... ACCEPT; iptables ...") is value
// content.
fn strip_inline_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, &byte) in bytes.iter().enumerate() {
        if (byte == b'#' || byte == b';') && idx > 0 && bytes[idx - 1].is_ascii_whitespace() {
            return line[..idx].trim_end();
        }
    }

    line
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_number<T>(key: &'static str, value: &str, line: usize) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .parse()
        .map_err(|source| ParseError::InvalidNumber { line, key, source })
}
