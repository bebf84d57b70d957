//! Property tests for identifiers, text cleaning and the JSON codec.

use proptest::prelude::*;
use stix_core::codec::{decode, encode};
use stix_core::model::{
    Campaign, FixedClock, Identifier, Location, NetworkTraffic, ObjectKind, StixObject, Timestamp,
};
use stix_core::sanitize::{clean_text, sanitize};

fn arb_kind() -> impl Strategy<Value = ObjectKind> {
    proptest::sample::select(ObjectKind::ALL.to_vec())
}

fn arb_token() -> impl Strategy<Value = String> {
    "[0-9a-f]{1,8}(-[0-9a-f]{1,8}){0,4}"
}

proptest! {
    /// parse(format(x)) == x for every kind/token pair
    #[test]
    fn identifier_roundtrip(kind in arb_kind(), token in arb_token()) {
        let id = Identifier::from_parts(kind, &token).unwrap();
        let parsed = Identifier::parse(&id.format()).unwrap();
        prop_assert_eq!(parsed.kind(), Some(kind));
        prop_assert_eq!(parsed.token(), Some(token.as_str()));
        prop_assert_eq!(parsed, id);
    }

    /// Tokens with characters outside [0-9a-f-] never parse
    #[test]
    fn identifier_rejects_bad_tokens(
        kind in arb_kind(),
        token in "[0-9a-f]{0,4}[g-zA-Z_ ][0-9a-z]{0,4}",
    ) {
        let s = format!("{}--{}", kind.as_str(), token);
        prop_assert!(Identifier::parse(&s).is_err());
    }

    /// clean_text(clean_text(s)) == clean_text(s)
    #[test]
    fn clean_text_idempotent(s in "\\PC*|[<>&\"' \\t\\na-z;#\\x00-\\x1f]*") {
        let once = clean_text(&s);
        prop_assert_eq!(clean_text(&once), once);
    }

    /// Cleaned text never contains raw markup characters
    #[test]
    fn clean_text_escapes(s in ".*") {
        let cleaned = clean_text(&s);
        prop_assert!(!cleaned.contains('<'));
        prop_assert!(!cleaned.contains('>'));
        prop_assert!(!cleaned.contains('"'));
    }

    /// Sanitizing twice changes nothing but `modified`
    #[test]
    fn sanitize_idempotent(name in ".*", description in ".*", label in ".*") {
        let mut campaign = Campaign::new();
        campaign.name = name;
        campaign.description = description;
        campaign.domain_common.add_label(label);
        let object = StixObject::from(campaign);

        let first = FixedClock(Timestamp::parse("2024-01-01T00:00:00Z").unwrap());
        let second = FixedClock(Timestamp::parse("2024-02-01T00:00:00Z").unwrap());
        let once = sanitize(&object, &first);
        let mut twice = sanitize(&once, &second);
        twice.domain_common_mut().unwrap().modified = once.domain_common().unwrap().modified;
        prop_assert_eq!(twice, once);
    }

    /// decode(kind, encode(o)) == o for free-text content
    #[test]
    fn codec_roundtrip_text(name in ".*", aliases in proptest::collection::vec(".*", 0..4)) {
        let mut campaign = Campaign::new();
        campaign.name = name;
        campaign.aliases = aliases;
        let object = StixObject::from(campaign);
        let bytes = encode(&object).unwrap();
        prop_assert_eq!(decode("campaign", &bytes).unwrap(), object);
    }

    /// Coordinates survive encoding bit for bit
    #[test]
    fn codec_roundtrip_coordinates(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0,
        precision in proptest::option::of(0.0f64..1.0e6),
    ) {
        let mut location = Location::new();
        location.latitude = Some(lat);
        location.longitude = Some(lon);
        location.precision = precision;
        let object = StixObject::from(location);
        let bytes = encode(&object).unwrap();
        prop_assert_eq!(decode("location", &bytes).unwrap(), object);
    }

    /// Optional integers round trip across their whole range
    #[test]
    fn codec_roundtrip_ports(src in any::<Option<i64>>(), dst in 0i64..=65_535) {
        let mut traffic = NetworkTraffic::new();
        traffic.src_port = src;
        traffic.dst_port = Some(dst);
        traffic.protocols = vec!["tcp".to_string()];
        let object = StixObject::from(traffic);
        let bytes = encode(&object).unwrap();
        prop_assert_eq!(decode("network-traffic", &bytes).unwrap(), object);
    }
}
