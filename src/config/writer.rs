use std::fmt;
use std::io;

use super::{Config, Interface, Peer, is_zero};

impl Config {
    /// Serializes to canonical INI text, returning the number of bytes
    /// written. Output is deterministic: the same config always yields
    /// the same bytes. Fails only if the sink fails; partial output may
    /// already have been emitted in that case.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        let text = self.render();
        writer.write_all(text.as_bytes())?;
        Ok(text.len())
    }

    fn render(&self) -> String {
        let mut out = String::new();

        render_section(&mut out, "[Interface]", &self.interface.properties());

        for peer in &self.peers {
            out.push('\n');
            if !peer.comment.is_empty() {
                out.push_str(&format!("; {}\n", peer.comment));
            }
            render_section(&mut out, "[Peer]", &peer.properties());
        }

        out
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// The key column width is the longest key actually present in this
// block, so blocks with different field sets align independently.
fn render_section(out: &mut String, header: &str, props: &[(&'static str, String)]) {
    out.push_str(header);
    out.push('\n');

    let width = props.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in props {
        out.push_str(&format!("{key:<width$} = {value}\n"));
    }
}

impl Interface {
    // Present (non-zero) fields in fixed emission order.
    fn properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();

        if !self.private_key.is_empty() {
            props.push(("PrivateKey", self.private_key.clone()));
        }
        if !self.address.is_empty() {
            props.push(("Address", self.address.clone()));
        }
        if !is_zero(&self.listen_port) {
            props.push(("ListenPort", self.listen_port.to_string()));
        }
        if !self.dns.is_empty() {
            props.push(("DNS", self.dns.join(",")));
        }
        if !is_zero(&self.table) {
            props.push(("Table", self.table.to_string()));
        }
        if !is_zero(&self.mtu) {
            props.push(("MTU", self.mtu.to_string()));
        }
        if !self.pre_up.is_empty() {
            props.push(("PreUp", self.pre_up.clone()));
        }
        if !self.post_up.is_empty() {
            props.push(("PostUp", self.post_up.clone()));
        }
        if !self.pre_down.is_empty() {
            props.push(("PreDown", self.pre_down.clone()));
        }
        if !self.post_down.is_empty() {
            props.push(("PostDown", self.post_down.clone()));
        }

        props
    }
}

impl Peer {
    fn properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();

        if !self.public_key.is_empty() {
            props.push(("PublicKey", self.public_key.clone()));
        }
        if !self.preshared_key.is_empty() {
            props.push(("PresharedKey", self.preshared_key.clone()));
        }
        if !self.allowed_ips.is_empty() {
            props.push(("AllowedIPs", self.allowed_ips.clone()));
        }
        if !self.endpoint.is_empty() {
            props.push(("Endpoint", self.endpoint.clone()));
        }
        if !is_zero(&self.persistent_keepalive) {
            props.push(("PersistentKeepalive", self.persistent_keepalive.to_string()));
        }

        props
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::config::{Config, Interface, Peer, Peers};

    fn sample_config() -> Config {
        Config {
            interface: Interface {
                listen_port: 5559,
                address: "10.77.24.1/24".to_string(),
                dns: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
                mtu: 800,
                private_key: "4CwbPHW85Y/xdgB/zD/P0bZdM3XVNpi85H45FMscB1A=".to_string(),
                post_up: "iptables -A FORWARD -i %i -j ACCEPT; iptables -t nat -A POSTROUTING -o eth0 -j MASQUERADE".to_string(),
                post_down: "iptables -D FORWARD -i %i -j ACCEPT; iptables -t nat -D POSTROUTING -o eth0 -j MASQUERADE".to_string(),
                ..Interface::default()
            },
            peers: Peers::from(vec![
                Peer {
                    comment: "Comment1".to_string(),
                    public_key: "gIIbPCSRw7qQnW/aS3g1PjZTEXnTBqSjo8sS9MADows=".to_string(),
                    allowed_ips: "10.77.24.22/32".to_string(),
                    endpoint: "endpoint".to_string(),
                    ..Peer::default()
                },
                Peer {
                    comment: "Comment".to_string(),
                    public_key: "KKJfVUC8awDEa4H7Pa5lRCvnq3cdrLMHpZVNF7YkgVA=".to_string(),
                    allowed_ips: "10.77.24.24/32".to_string(),
                    endpoint: "endpoint2".to_string(),
                    ..Peer::default()
                },
                Peer {
                    public_key: "IJgEGy5QPRbwuf7yY1+bbirFeHoNwdYzIfrWMNFEG30=".to_string(),
                    allowed_ips: "10.77.24.26/32".to_string(),
                    persistent_keepalive: 30,
                    ..Peer::default()
                },
                Peer {
                    public_key: "NafllWlCPqa4Jhv10Rjbk38pxyWiWcpkwRYwcd47qic=".to_string(),
                    allowed_ips: "10.77.24.28/32".to_string(),
                    ..Peer::default()
                },
            ]),
        }
    }

    #[test]
    fn write_full_config() {
        let expected = "\
[Interface]
PrivateKey = 4CwbPHW85Y/xdgB/zD/P0bZdM3XVNpi85H45FMscB1A=
Address    = 10.77.24.1/24
ListenPort = 5559
DNS        = 8.8.8.8,8.8.4.4
MTU        = 800
PostUp     = iptables -A FORWARD -i %i -j ACCEPT; iptables -t nat -A POSTROUTING -o eth0 -j MASQUERADE
PostDown   = iptables -D FORWARD -i %i -j ACCEPT; iptables -t nat -D POSTROUTING -o eth0 -j MASQUERADE

; Comment1
[Peer]
PublicKey  = gIIbPCSRw7qQnW/aS3g1PjZTEXnTBqSjo8sS9MADows=
AllowedIPs = 10.77.24.22/32
Endpoint   = endpoint

; Comment
[Peer]
PublicKey  = KKJfVUC8awDEa4H7Pa5lRCvnq3cdrLMHpZVNF7YkgVA=
AllowedIPs = 10.77.24.24/32
Endpoint   = endpoint2

[Peer]
PublicKey           = IJgEGy5QPRbwuf7yY1+bbirFeHoNwdYzIfrWMNFEG30=
AllowedIPs          = 10.77.24.26/32
PersistentKeepalive = 30

[Peer]
PublicKey  = NafllWlCPqa4Jhv10Rjbk38pxyWiWcpkwRYwcd47qic=
AllowedIPs = 10.77.24.28/32
";

        let config = sample_config();

        let mut data = Vec::new();
        let written = config.write_to(&mut data).unwrap();

        assert_eq!(String::from_utf8(data).unwrap(), expected);
        assert_eq!(written, expected.len());
    }

    #[test]
    fn zero_value_writes_bare_interface_header() {
        let config = Config::default();

        let mut data = Vec::new();
        let written = config.write_to(&mut data).unwrap();

        assert_eq!(data, b"[Interface]\n");
        assert_eq!(written, 12);
    }

    #[test]
    fn display_matches_write_to() {
        let config = sample_config();

        let mut data = Vec::new();
        config.write_to(&mut data).unwrap();

        assert_eq!(config.to_string().into_bytes(), data);
    }

    #[test]
    fn written_output_reads_back_identically() {
        let config = sample_config();

        let mut data = Vec::new();
        config.write_to(&mut data).unwrap();

        let reread = Config::from_reader(data.as_slice()).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn failing_sink_surfaces_the_error() {
        struct BrokenSink;

        impl std::io::Write for BrokenSink {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = sample_config().write_to(&mut BrokenSink).unwrap_err();
        assert_eq!(err.to_string(), "sink closed");
    }
}
