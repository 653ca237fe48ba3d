//! Match field set of a flow entry.
//!
//! A [`Match`] is a composite of independently optional per-layer matchers.
//! Every protocol layer starts out absent and is materialized by the first
//! setter that touches it; later setters on the same layer fill in fields of
//! that same instance, so sibling fields are never lost.
//!
//! Setters accept any value. Range checks and cross-field legality (a TCP
//! port without `ip-protocol = 6`, say) are left to the controller.

use serde::{Deserialize, Serialize};

/// An address with an optional mask (`{address, mask}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedAddress {
    pub address: Option<String>,
    pub mask: Option<String>,
}

/// `ethernet-type` container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetType {
    #[serde(rename = "type")]
    pub ether_type: Option<u16>,
}

/// Ethernet header matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetMatch {
    pub ethernet_type: Option<EthernetType>,
    pub ethernet_source: Option<MaskedAddress>,
    pub ethernet_destination: Option<MaskedAddress>,
}

/// `vlan-id` container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanIdMatch {
    pub vlan_id: Option<u16>,
    pub vlan_id_present: Option<bool>,
}

/// VLAN tag matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanMatch {
    pub vlan_id: Option<VlanIdMatch>,
    pub vlan_pcp: Option<u8>,
}

/// IP header class matcher (DSCP, ECN, protocol number).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpMatch {
    pub ip_dscp: Option<u8>,
    pub ip_ecn: Option<u8>,
    pub ip_protocol: Option<u8>,
}

/// IPv6 flow label with mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Label {
    pub ipv6_flabel: Option<u32>,
    pub flabel_mask: Option<u32>,
}

/// IPv6 extension header pseudo-field with mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6ExtHeader {
    pub ipv6_exthdr: Option<u16>,
    pub ipv6_exthdr_mask: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icmpv4Match {
    pub icmpv4_type: Option<u8>,
    pub icmpv4_code: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icmpv6Match {
    pub icmpv6_type: Option<u8>,
    pub icmpv6_code: Option<u8>,
}

/// Provider backbone bridging service instance matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbbMatch {
    pub pbb_isid: Option<u32>,
    pub pbb_mask: Option<u32>,
}

/// MPLS and PBB label fields (`protocol-match-fields` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMatchFields {
    pub mpls_label: Option<u32>,
    pub mpls_tc: Option<u8>,
    pub mpls_bos: Option<u8>,
    pub pbb: Option<PbbMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelMatch {
    pub tunnel_id: Option<u64>,
}

/// Table metadata with mask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataMatch {
    pub metadata: Option<u64>,
    pub metadata_mask: Option<u64>,
}

/// The predicate part of a flow entry.
///
/// Also used as the payload of the set-field action, where the populated
/// fields name the header values to rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    in_port: Option<String>,
    in_phy_port: Option<String>,
    metadata: Option<MetadataMatch>,
    tunnel: Option<TunnelMatch>,
    ethernet_match: Option<EthernetMatch>,
    vlan_match: Option<VlanMatch>,
    ip_match: Option<IpMatch>,
    ipv4_source: Option<String>,
    ipv4_destination: Option<String>,
    ipv6_source: Option<String>,
    ipv6_destination: Option<String>,
    ipv6_label: Option<Ipv6Label>,
    ipv6_nd_target: Option<String>,
    ipv6_nd_sll: Option<String>,
    ipv6_nd_tll: Option<String>,
    ipv6_ext_header: Option<Ipv6ExtHeader>,
    tcp_source_port: Option<u16>,
    tcp_destination_port: Option<u16>,
    udp_source_port: Option<u16>,
    udp_destination_port: Option<u16>,
    sctp_source_port: Option<u16>,
    sctp_destination_port: Option<u16>,
    icmpv4_match: Option<Icmpv4Match>,
    icmpv6_match: Option<Icmpv6Match>,
    arp_op: Option<u16>,
    arp_source_transport_address: Option<String>,
    arp_target_transport_address: Option<String>,
    arp_source_hardware_address: Option<MaskedAddress>,
    arp_target_hardware_address: Option<MaskedAddress>,
    protocol_match_fields: Option<ProtocolMatchFields>,
}

impl Match {
    /// Creates an empty match (matches every packet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field has been set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    // Ingress port

    pub fn set_in_port(&mut self, port: impl Into<String>) -> &mut Self {
        self.in_port = Some(port.into());
        self
    }

    pub fn set_in_phy_port(&mut self, port: impl Into<String>) -> &mut Self {
        self.in_phy_port = Some(port.into());
        self
    }

    // Metadata and tunnel

    pub fn set_metadata(&mut self, metadata: u64) -> &mut Self {
        self.metadata
            .get_or_insert_with(MetadataMatch::default)
            .metadata = Some(metadata);
        self
    }

    pub fn set_metadata_mask(&mut self, mask: u64) -> &mut Self {
        self.metadata
            .get_or_insert_with(MetadataMatch::default)
            .metadata_mask = Some(mask);
        self
    }

    pub fn set_tunnel_id(&mut self, tunnel_id: u64) -> &mut Self {
        self.tunnel.get_or_insert_with(TunnelMatch::default).tunnel_id = Some(tunnel_id);
        self
    }

    // Ethernet

    fn ethernet(&mut self) -> &mut EthernetMatch {
        self.ethernet_match.get_or_insert_with(EthernetMatch::default)
    }

    /// Sets the EtherType (`ethernet-match/ethernet-type/type`).
    pub fn set_eth_type(&mut self, ether_type: u16) -> &mut Self {
        self.ethernet()
            .ethernet_type
            .get_or_insert_with(EthernetType::default)
            .ether_type = Some(ether_type);
        self
    }

    pub fn set_eth_src(&mut self, address: impl Into<String>) -> &mut Self {
        self.ethernet()
            .ethernet_source
            .get_or_insert_with(MaskedAddress::default)
            .address = Some(address.into());
        self
    }

    pub fn set_eth_src_mask(&mut self, mask: impl Into<String>) -> &mut Self {
        self.ethernet()
            .ethernet_source
            .get_or_insert_with(MaskedAddress::default)
            .mask = Some(mask.into());
        self
    }

    pub fn set_eth_dst(&mut self, address: impl Into<String>) -> &mut Self {
        self.ethernet()
            .ethernet_destination
            .get_or_insert_with(MaskedAddress::default)
            .address = Some(address.into());
        self
    }

    pub fn set_eth_dst_mask(&mut self, mask: impl Into<String>) -> &mut Self {
        self.ethernet()
            .ethernet_destination
            .get_or_insert_with(MaskedAddress::default)
            .mask = Some(mask.into());
        self
    }

    // VLAN

    fn vlan(&mut self) -> &mut VlanMatch {
        self.vlan_match.get_or_insert_with(VlanMatch::default)
    }

    /// Sets the VLAN id and marks the tag as present.
    pub fn set_vlan_id(&mut self, vlan_id: u16) -> &mut Self {
        let id = self.vlan().vlan_id.get_or_insert_with(VlanIdMatch::default);
        id.vlan_id = Some(vlan_id);
        id.vlan_id_present = Some(true);
        self
    }

    pub fn set_vlan_id_present(&mut self, present: bool) -> &mut Self {
        self.vlan()
            .vlan_id
            .get_or_insert_with(VlanIdMatch::default)
            .vlan_id_present = Some(present);
        self
    }

    pub fn set_vlan_pcp(&mut self, pcp: u8) -> &mut Self {
        self.vlan().vlan_pcp = Some(pcp);
        self
    }

    // IP header class

    fn ip(&mut self) -> &mut IpMatch {
        self.ip_match.get_or_insert_with(IpMatch::default)
    }

    pub fn set_ip_dscp(&mut self, dscp: u8) -> &mut Self {
        self.ip().ip_dscp = Some(dscp);
        self
    }

    pub fn set_ip_ecn(&mut self, ecn: u8) -> &mut Self {
        self.ip().ip_ecn = Some(ecn);
        self
    }

    pub fn set_ip_protocol(&mut self, protocol: u8) -> &mut Self {
        self.ip().ip_protocol = Some(protocol);
        self
    }

    // IPv4

    /// Sets the IPv4 source, usually in prefix form (`10.0.0.0/24`).
    pub fn set_ipv4_src(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.ipv4_source = Some(prefix.into());
        self
    }

    /// Sets the IPv4 destination, usually in prefix form (`10.0.0.0/24`).
    pub fn set_ipv4_dst(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.ipv4_destination = Some(prefix.into());
        self
    }

    // IPv6

    pub fn set_ipv6_src(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.ipv6_source = Some(prefix.into());
        self
    }

    pub fn set_ipv6_dst(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.ipv6_destination = Some(prefix.into());
        self
    }

    pub fn set_ipv6_flabel(&mut self, flabel: u32) -> &mut Self {
        self.ipv6_label
            .get_or_insert_with(Ipv6Label::default)
            .ipv6_flabel = Some(flabel);
        self
    }

    pub fn set_ipv6_flabel_mask(&mut self, mask: u32) -> &mut Self {
        self.ipv6_label
            .get_or_insert_with(Ipv6Label::default)
            .flabel_mask = Some(mask);
        self
    }

    pub fn set_ipv6_nd_target(&mut self, address: impl Into<String>) -> &mut Self {
        self.ipv6_nd_target = Some(address.into());
        self
    }

    pub fn set_ipv6_nd_sll(&mut self, address: impl Into<String>) -> &mut Self {
        self.ipv6_nd_sll = Some(address.into());
        self
    }

    pub fn set_ipv6_nd_tll(&mut self, address: impl Into<String>) -> &mut Self {
        self.ipv6_nd_tll = Some(address.into());
        self
    }

    pub fn set_ipv6_exthdr(&mut self, exthdr: u16) -> &mut Self {
        self.ipv6_ext_header
            .get_or_insert_with(Ipv6ExtHeader::default)
            .ipv6_exthdr = Some(exthdr);
        self
    }

    pub fn set_ipv6_exthdr_mask(&mut self, mask: u16) -> &mut Self {
        self.ipv6_ext_header
            .get_or_insert_with(Ipv6ExtHeader::default)
            .ipv6_exthdr_mask = Some(mask);
        self
    }

    // Transport ports

    pub fn set_tcp_src_port(&mut self, port: u16) -> &mut Self {
        self.tcp_source_port = Some(port);
        self
    }

    pub fn set_tcp_dst_port(&mut self, port: u16) -> &mut Self {
        self.tcp_destination_port = Some(port);
        self
    }

    pub fn set_udp_src_port(&mut self, port: u16) -> &mut Self {
        self.udp_source_port = Some(port);
        self
    }

    pub fn set_udp_dst_port(&mut self, port: u16) -> &mut Self {
        self.udp_destination_port = Some(port);
        self
    }

    pub fn set_sctp_src_port(&mut self, port: u16) -> &mut Self {
        self.sctp_source_port = Some(port);
        self
    }

    pub fn set_sctp_dst_port(&mut self, port: u16) -> &mut Self {
        self.sctp_destination_port = Some(port);
        self
    }

    // ICMP

    pub fn set_icmpv4_type(&mut self, icmp_type: u8) -> &mut Self {
        self.icmpv4_match
            .get_or_insert_with(Icmpv4Match::default)
            .icmpv4_type = Some(icmp_type);
        self
    }

    pub fn set_icmpv4_code(&mut self, code: u8) -> &mut Self {
        self.icmpv4_match
            .get_or_insert_with(Icmpv4Match::default)
            .icmpv4_code = Some(code);
        self
    }

    pub fn set_icmpv6_type(&mut self, icmp_type: u8) -> &mut Self {
        self.icmpv6_match
            .get_or_insert_with(Icmpv6Match::default)
            .icmpv6_type = Some(icmp_type);
        self
    }

    pub fn set_icmpv6_code(&mut self, code: u8) -> &mut Self {
        self.icmpv6_match
            .get_or_insert_with(Icmpv6Match::default)
            .icmpv6_code = Some(code);
        self
    }

    // ARP

    pub fn set_arp_op(&mut self, op: u16) -> &mut Self {
        self.arp_op = Some(op);
        self
    }

    pub fn set_arp_src_transport_addr(&mut self, address: impl Into<String>) -> &mut Self {
        self.arp_source_transport_address = Some(address.into());
        self
    }

    pub fn set_arp_tgt_transport_addr(&mut self, address: impl Into<String>) -> &mut Self {
        self.arp_target_transport_address = Some(address.into());
        self
    }

    pub fn set_arp_src_hw_addr(&mut self, address: impl Into<String>) -> &mut Self {
        self.arp_source_hardware_address
            .get_or_insert_with(MaskedAddress::default)
            .address = Some(address.into());
        self
    }

    pub fn set_arp_src_hw_addr_mask(&mut self, mask: impl Into<String>) -> &mut Self {
        self.arp_source_hardware_address
            .get_or_insert_with(MaskedAddress::default)
            .mask = Some(mask.into());
        self
    }

    pub fn set_arp_tgt_hw_addr(&mut self, address: impl Into<String>) -> &mut Self {
        self.arp_target_hardware_address
            .get_or_insert_with(MaskedAddress::default)
            .address = Some(address.into());
        self
    }

    pub fn set_arp_tgt_hw_addr_mask(&mut self, mask: impl Into<String>) -> &mut Self {
        self.arp_target_hardware_address
            .get_or_insert_with(MaskedAddress::default)
            .mask = Some(mask.into());
        self
    }

    // MPLS / PBB

    fn protocol_fields(&mut self) -> &mut ProtocolMatchFields {
        self.protocol_match_fields
            .get_or_insert_with(ProtocolMatchFields::default)
    }

    pub fn set_mpls_label(&mut self, label: u32) -> &mut Self {
        self.protocol_fields().mpls_label = Some(label);
        self
    }

    pub fn set_mpls_tc(&mut self, tc: u8) -> &mut Self {
        self.protocol_fields().mpls_tc = Some(tc);
        self
    }

    pub fn set_mpls_bos(&mut self, bos: u8) -> &mut Self {
        self.protocol_fields().mpls_bos = Some(bos);
        self
    }

    pub fn set_pbb_isid(&mut self, isid: u32) -> &mut Self {
        self.protocol_fields()
            .pbb
            .get_or_insert_with(PbbMatch::default)
            .pbb_isid = Some(isid);
        self
    }

    pub fn set_pbb_mask(&mut self, mask: u32) -> &mut Self {
        self.protocol_fields()
            .pbb
            .get_or_insert_with(PbbMatch::default)
            .pbb_mask = Some(mask);
        self
    }

    // Accessors

    pub fn in_port(&self) -> Option<&str> {
        self.in_port.as_deref()
    }

    pub fn in_phy_port(&self) -> Option<&str> {
        self.in_phy_port.as_deref()
    }

    pub fn metadata(&self) -> Option<&MetadataMatch> {
        self.metadata.as_ref()
    }

    pub fn tunnel(&self) -> Option<&TunnelMatch> {
        self.tunnel.as_ref()
    }

    pub fn ethernet_match(&self) -> Option<&EthernetMatch> {
        self.ethernet_match.as_ref()
    }

    /// Returns the EtherType, if one has been set.
    pub fn eth_type(&self) -> Option<u16> {
        self.ethernet_match
            .as_ref()
            .and_then(|eth| eth.ethernet_type.as_ref())
            .and_then(|t| t.ether_type)
    }

    pub fn vlan_match(&self) -> Option<&VlanMatch> {
        self.vlan_match.as_ref()
    }

    pub fn ip_match(&self) -> Option<&IpMatch> {
        self.ip_match.as_ref()
    }

    pub fn ipv4_src(&self) -> Option<&str> {
        self.ipv4_source.as_deref()
    }

    pub fn ipv4_dst(&self) -> Option<&str> {
        self.ipv4_destination.as_deref()
    }

    pub fn ipv6_src(&self) -> Option<&str> {
        self.ipv6_source.as_deref()
    }

    pub fn ipv6_dst(&self) -> Option<&str> {
        self.ipv6_destination.as_deref()
    }

    pub fn ipv6_label(&self) -> Option<&Ipv6Label> {
        self.ipv6_label.as_ref()
    }

    pub fn ipv6_nd_target(&self) -> Option<&str> {
        self.ipv6_nd_target.as_deref()
    }

    pub fn ipv6_nd_sll(&self) -> Option<&str> {
        self.ipv6_nd_sll.as_deref()
    }

    pub fn ipv6_nd_tll(&self) -> Option<&str> {
        self.ipv6_nd_tll.as_deref()
    }

    pub fn ipv6_ext_header(&self) -> Option<&Ipv6ExtHeader> {
        self.ipv6_ext_header.as_ref()
    }

    pub fn tcp_src_port(&self) -> Option<u16> {
        self.tcp_source_port
    }

    pub fn tcp_dst_port(&self) -> Option<u16> {
        self.tcp_destination_port
    }

    pub fn udp_src_port(&self) -> Option<u16> {
        self.udp_source_port
    }

    pub fn udp_dst_port(&self) -> Option<u16> {
        self.udp_destination_port
    }

    pub fn sctp_src_port(&self) -> Option<u16> {
        self.sctp_source_port
    }

    pub fn sctp_dst_port(&self) -> Option<u16> {
        self.sctp_destination_port
    }

    pub fn icmpv4_match(&self) -> Option<&Icmpv4Match> {
        self.icmpv4_match.as_ref()
    }

    pub fn icmpv6_match(&self) -> Option<&Icmpv6Match> {
        self.icmpv6_match.as_ref()
    }

    pub fn arp_op(&self) -> Option<u16> {
        self.arp_op
    }

    pub fn arp_src_transport_addr(&self) -> Option<&str> {
        self.arp_source_transport_address.as_deref()
    }

    pub fn arp_tgt_transport_addr(&self) -> Option<&str> {
        self.arp_target_transport_address.as_deref()
    }

    pub fn arp_src_hw_addr(&self) -> Option<&MaskedAddress> {
        self.arp_source_hardware_address.as_ref()
    }

    pub fn arp_tgt_hw_addr(&self) -> Option<&MaskedAddress> {
        self.arp_target_hardware_address.as_ref()
    }

    pub fn protocol_match_fields(&self) -> Option<&ProtocolMatchFields> {
        self.protocol_match_fields.as_ref()
    }
}
