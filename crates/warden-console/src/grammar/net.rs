//! Network diagnostic grammars: split packets, net-channel stats, and the
//! `net_status` summary family.
//!
//! The two `per client out ...` grammars are textual siblings distinguished
//! only by their suffix; the registry orders the data variant first.

use std::sync::LazyLock;

use regex::Regex;

use super::{decode_field, LineMatcher};
use crate::error::ParseError;
use crate::event::{ConsoleLine, SocketType, SplitPacket};

static SPLIT_PACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<-- \[(.{3})\] Split packet +(\d+)/ +(\d+) seq +(\d+) size +(\d+) mtu +(\d+) from ([0-9.:a-fA-F]+:\d+)$",
    )
    .expect("static pattern")
});

/// `<-- [cl ] Split packet   1/   4 seq    12 size  512 mtu 1200 from ADDR`
pub struct SplitPacketMatcher;

impl LineMatcher for SplitPacketMatcher {
    fn name(&self) -> &'static str {
        "split-packet"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = SPLIT_PACKET.captures(text) else {
            return Ok(None);
        };

        let socket = SocketType::from_token(&caps[1])?;
        // 1-based on the wire, 0-based internally.
        let wire_index: u32 = decode_field(self.name(), "index", &caps[2])?;
        let index = wire_index.saturating_sub(1);

        Ok(Some(ConsoleLine::SplitPacket(SplitPacket {
            socket,
            index,
            count: decode_field(self.name(), "count", &caps[3])?,
            sequence: decode_field(self.name(), "sequence", &caps[4])?,
            size: decode_field(self.name(), "size", &caps[5])?,
            mtu: decode_field(self.name(), "mtu", &caps[6])?,
            total_size: 0,
            address: caps[7].to_string(),
        })))
    }
}

/// A grammar of exactly two decimal floats, shared by the whole
/// net-channel/net-status family. Construction picks the pattern and the
/// event constructor; `first`/`second` follow the order printed on the line.
pub struct FloatPairMatcher {
    grammar: &'static str,
    regex: &'static LazyLock<Regex>,
    build: fn(first: f32, second: f32) -> ConsoleLine,
}

impl LineMatcher for FloatPairMatcher {
    fn name(&self) -> &'static str {
        self.grammar
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = self.regex.captures(text) else {
            return Ok(None);
        };
        let first: f32 = decode_field(self.grammar, "first", &caps[1])?;
        let second: f32 = decode_field(self.grammar, "second", &caps[2])?;
        Ok(Some((self.build)(first, second)))
    }
}

static LATENCY_LOSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- latency: (\d+\.\d+), loss (\d+\.\d+)$").expect("static pattern"));
static PACKET_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- packets: in (\d+\.\d+)/s, out (\d+\.\d+)/s$").expect("static pattern")
});
static CHOKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- choke: in (\d+\.\d+), out (\d+\.\d+)$").expect("static pattern"));
static FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- flow: in (\d+\.\d+), out (\d+\.\d+) kB/s$").expect("static pattern")
});
static CHANNEL_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- total: in (\d+\.\d+), out (\d+\.\d+) MB$").expect("static pattern")
});
static TOTAL_PACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- Packets: net total out  (\d+\.\d+)/s, in (\d+\.\d+)/s$").expect("static pattern")
});
static PER_CLIENT_PACKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^           per client out (\d+\.\d+)/s, in (\d+\.\d+)/s$").expect("static pattern")
});
static TOTAL_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- Data:    net total out  (\d+\.\d+), in (\d+\.\d+) kB/s$").expect("static pattern")
});
static PER_CLIENT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^           per client out (\d+\.\d+), in (\d+\.\d+) kB/s$").expect("static pattern")
});

impl FloatPairMatcher {
    /// `- latency: 0.045, loss 0.02`
    pub fn latency_loss() -> Self {
        Self {
            grammar: "net-latency-loss",
            regex: &LATENCY_LOSS,
            build: |latency, loss| ConsoleLine::NetLatencyLoss { latency, loss },
        }
    }

    /// `- packets: in 30.1/s, out 29.9/s`
    pub fn packet_rate() -> Self {
        Self {
            grammar: "net-packet-rate",
            regex: &PACKET_RATE,
            build: |inbound, outbound| ConsoleLine::NetPacketRate { inbound, outbound },
        }
    }

    /// `- choke: in 0.01, out 0.00`
    pub fn choke() -> Self {
        Self {
            grammar: "net-choke",
            regex: &CHOKE,
            build: |inbound, outbound| ConsoleLine::NetChoke { inbound, outbound },
        }
    }

    /// `- flow: in 12.4, out 6.2 kB/s`
    pub fn flow() -> Self {
        Self {
            grammar: "net-flow",
            regex: &FLOW,
            build: |inbound_kbps, outbound_kbps| ConsoleLine::NetFlow {
                inbound_kbps,
                outbound_kbps,
            },
        }
    }

    /// `- total: in 104.9, out 59.1 MB`
    pub fn channel_total() -> Self {
        Self {
            grammar: "net-channel-total",
            regex: &CHANNEL_TOTAL,
            build: |inbound_mb, outbound_mb| ConsoleLine::NetChannelTotal {
                inbound_mb,
                outbound_mb,
            },
        }
    }

    /// `- Packets: net total out  29.9/s, in 30.1/s`
    pub fn total_packets() -> Self {
        Self {
            grammar: "net-total-packets",
            regex: &TOTAL_PACKETS,
            build: |outbound, inbound| ConsoleLine::NetTotalPackets { inbound, outbound },
        }
    }

    /// `           per client out 29.9/s, in 30.1/s`
    pub fn per_client_packets() -> Self {
        Self {
            grammar: "net-per-client-packets",
            regex: &PER_CLIENT_PACKETS,
            build: |outbound, inbound| ConsoleLine::NetPerClientPackets { inbound, outbound },
        }
    }

    /// `- Data:    net total out  6.2, in 12.4 kB/s`
    pub fn total_data() -> Self {
        Self {
            grammar: "net-total-data",
            regex: &TOTAL_DATA,
            build: |outbound_kbps, inbound_kbps| ConsoleLine::NetTotalData {
                inbound_kbps,
                outbound_kbps,
            },
        }
    }

    /// `           per client out 6.2, in 12.4 kB/s`
    pub fn per_client_data() -> Self {
        Self {
            grammar: "net-per-client-data",
            regex: &PER_CLIENT_DATA,
            build: |outbound_kbps, inbound_kbps| ConsoleLine::NetPerClientData {
                inbound_kbps,
                outbound_kbps,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_packet_decodes_all_fields() {
        let line = SplitPacketMatcher
            .try_parse("<-- [cl ] Split packet   1/   4 seq    12 size  512 mtu 1200 from 10.0.0.5:27015")
            .unwrap()
            .unwrap();
        let ConsoleLine::SplitPacket(packet) = line else {
            panic!("wrong variant: {line:?}");
        };
        assert_eq!(packet.socket, SocketType::Client);
        assert_eq!(packet.index, 0); // 1-based on the wire
        assert_eq!(packet.count, 4);
        assert_eq!(packet.sequence, 12);
        assert_eq!(packet.size, 512);
        assert_eq!(packet.mtu, 1200);
        assert_eq!(packet.address, "10.0.0.5:27015");
    }

    #[test]
    fn split_packet_round_trips_through_display() {
        // Byte-for-byte wire padding, only the total field appended.
        let text =
            "<-- [cl ] Split packet   1/   4 seq    12 size  512 mtu 1200 from 10.0.0.5:27015";
        let line = SplitPacketMatcher.try_parse(text).unwrap().unwrap();
        let ConsoleLine::SplitPacket(packet) = line else {
            panic!("wrong variant");
        };
        assert_eq!(packet.to_string(), format!("{text} [ total    0 ]"));

        let text =
            "<-- [sv ] Split packet   2/   3 seq   845 size 1248 mtu 1260 from 192.168.0.7:27015";
        let line = SplitPacketMatcher.try_parse(text).unwrap().unwrap();
        let ConsoleLine::SplitPacket(packet) = line else {
            panic!("wrong variant");
        };
        assert_eq!(packet.to_string(), format!("{text} [ total    0 ]"));
    }

    #[test]
    fn split_packet_unknown_socket_is_decode_failure() {
        let result = SplitPacketMatcher
            .try_parse("<-- [xyz] Split packet   1/   4 seq    12 size  512 mtu 1200 from 10.0.0.5:27015");
        assert!(matches!(result, Err(ParseError::UnknownSocketType { .. })));
    }

    #[test]
    fn split_packet_numeric_overflow_is_decode_failure() {
        let result = SplitPacketMatcher.try_parse(
            "<-- [cl ] Split packet   1/   4 seq 99999999999999999999 size  512 mtu 1200 from 10.0.0.5:27015",
        );
        assert!(matches!(
            result,
            Err(ParseError::InvalidNumber { field: "sequence", .. })
        ));
    }

    #[test]
    fn split_packet_non_matching_line_is_no_match() {
        assert_eq!(SplitPacketMatcher.try_parse("lobby created").unwrap(), None);
    }

    #[test]
    fn latency_loss_decodes() {
        let line = FloatPairMatcher::latency_loss()
            .try_parse("- latency: 0.045, loss 0.02")
            .unwrap()
            .unwrap();
        assert_eq!(
            line,
            ConsoleLine::NetLatencyLoss {
                latency: 0.045,
                loss: 0.02
            }
        );
    }

    #[test]
    fn packet_rate_decodes() {
        let line = FloatPairMatcher::packet_rate()
            .try_parse("- packets: in 30.1/s, out 29.9/s")
            .unwrap()
            .unwrap();
        assert_eq!(
            line,
            ConsoleLine::NetPacketRate {
                inbound: 30.1,
                outbound: 29.9
            }
        );
    }

    #[test]
    fn net_status_out_in_ordering_is_preserved() {
        let line = FloatPairMatcher::total_packets()
            .try_parse("- Packets: net total out  29.9/s, in 30.1/s")
            .unwrap()
            .unwrap();
        assert_eq!(
            line,
            ConsoleLine::NetTotalPackets {
                inbound: 30.1,
                outbound: 29.9
            }
        );
    }

    #[test]
    fn per_client_variants_do_not_cross_match() {
        let packets = FloatPairMatcher::per_client_packets();
        let data = FloatPairMatcher::per_client_data();

        let packet_line = "           per client out 29.9/s, in 30.1/s";
        let data_line = "           per client out 6.2, in 12.4 kB/s";

        assert!(packets.try_parse(packet_line).unwrap().is_some());
        assert_eq!(packets.try_parse(data_line).unwrap(), None);
        assert!(data.try_parse(data_line).unwrap().is_some());
        assert_eq!(data.try_parse(packet_line).unwrap(), None);
    }

    #[test]
    fn channel_family_decodes() {
        assert!(matches!(
            FloatPairMatcher::choke()
                .try_parse("- choke: in 0.01, out 0.00")
                .unwrap(),
            Some(ConsoleLine::NetChoke { .. })
        ));
        assert!(matches!(
            FloatPairMatcher::flow()
                .try_parse("- flow: in 12.4, out 6.2 kB/s")
                .unwrap(),
            Some(ConsoleLine::NetFlow { .. })
        ));
        assert!(matches!(
            FloatPairMatcher::channel_total()
                .try_parse("- total: in 104.9, out 59.1 MB")
                .unwrap(),
            Some(ConsoleLine::NetChannelTotal { .. })
        ));
    }
}
