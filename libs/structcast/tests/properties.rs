// Property tests: idempotence, truncation, and text round trips.

use proptest::prelude::*;
use structcast::{Reflect, Value, convert, from_source, to_value};

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct Sample {
    pub count: i64,
    pub score: f64,
    pub label: String,
    pub enabled: bool,
    pub items: Vec<i32>,
}

fn sample_source() -> impl Strategy<Value = Value> {
    (
        any::<i64>(),
        -1.0e9f64..1.0e9,
        "[a-z]{0,8}",
        any::<bool>(),
        prop::collection::vec(any::<i32>(), 0..5),
    )
        .prop_map(|(count, score, label, enabled, items)| {
            Value::map([
                ("count", Value::Text(count.to_string())),
                ("score", Value::Float(score)),
                ("label", Value::Text(label)),
                ("enabled", Value::Int(i64::from(enabled))),
                (
                    "items",
                    Value::Seq(items.into_iter().map(|i| Value::Text(i.to_string())).collect()),
                ),
            ])
        })
}

proptest! {
    #[test]
    fn converting_twice_equals_converting_once(source in sample_source()) {
        let mut once = Sample::default();
        convert(&mut once, &source).unwrap();

        let mut twice = once.clone();
        convert(&mut twice, &source).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn record_survives_a_map_round_trip(source in sample_source()) {
        let original: Sample = from_source(&source).unwrap();
        let restored: Sample = from_source(&to_value(&original)).unwrap();
        prop_assert_eq!(original, restored);
    }

    #[test]
    fn float_to_int_truncates_toward_zero(value in -1.0e15f64..1.0e15) {
        let mut dest = 0i64;
        convert(&mut dest, &value).unwrap();
        prop_assert_eq!(dest, value.trunc() as i64);
    }

    #[test]
    fn integers_survive_text(value in any::<i64>()) {
        let mut text = String::new();
        convert(&mut text, &value).unwrap();
        let mut back = 0i64;
        convert(&mut back, &text).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn floats_survive_text(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let mut text = String::new();
        convert(&mut text, &value).unwrap();
        let mut back = 0.0f64;
        convert(&mut back, &text).unwrap();
        prop_assert_eq!(back, value);
    }
}
