use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use adr_core::artifact::ArtifactError;
use adr_core::{
    BookingRecord, CustomerType, DepositType, DistributionChannel, FeatureRow, HotelType,
    MarketSegment, MealPlan, RoomType, Weekday,
};
use adr_features::EncodeError;
use adr_predictors::{ConstantRegressor, PriceAdapter};
use adr_runtime::{ArtifactConfig, ErrorKind, ModelContext, PredictionService};
use serde_json::json;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn context() -> ModelContext {
    ModelContext::load(&ArtifactConfig::with_dir(fixtures())).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "{actual} != {expected}"
    );
}

fn resort_scenario() -> BookingRecord {
    BookingRecord {
        hotel: HotelType::Resort,
        meal: MealPlan::FullBoard,
        distribution_channel: DistributionChannel::Direct,
        deposit_type: DepositType::NonRefund,
        customer_type: CustomerType::Transient,
        arrival_day_of_week: Weekday::Saturday,
        country: "USA".to_string(),
        market_segment: MarketSegment::Direct,
        reserved_room_type: RoomType::A,
        assigned_room_type: RoomType::A,
        ..Default::default()
    }
}

#[test]
fn loads_all_three_artifacts() {
    let ctx = context();
    assert_eq!(ctx.schema().len(), 36);
    assert_eq!(ctx.schema().columns()[22], "hotel_Resort Hotel");
}

#[test]
fn resort_scenario_matches_golden_price() {
    let prediction = context().predict(&resort_scenario()).unwrap();
    assert_close(prediction.log_price, 4.6458);
    assert_close(prediction.price, 103.14664978720249);
    assert!(prediction.fallback_columns.is_empty());
}

#[test]
fn resort_scenario_matches_golden_price_with_tree_model() {
    let cfg = ArtifactConfig {
        model: PathBuf::from("tree_model.json"),
        ..ArtifactConfig::with_dir(fixtures())
    };
    let prediction = ModelContext::load(&cfg).unwrap().predict(&resort_scenario()).unwrap();
    assert_close(prediction.log_price, 4.6875);
    assert_close(prediction.price, 107.5813867407896);
}

#[test]
fn form_defaults_match_golden_price() {
    let prediction = context().predict(&BookingRecord::default()).unwrap();
    assert_close(prediction.price, 90.72546135577271);
}

#[test]
fn summer_family_booking_matches_golden_price() {
    let input = json!({
        "hotel": "City Hotel",
        "is_canceled": 0,
        "lead_time": 120,
        "arrival_date_month": 8,
        "arrival_date_day_of_month": 3,
        "arrival_day_of_week": "Friday",
        "stays_in_weekend_nights": 1,
        "stays_in_week_nights": 2,
        "adults": 3,
        "children": 1,
        "babies": 0,
        "is_repeated_guest": 0,
        "previous_cancellations": 0,
        "previous_bookings_not_canceled": 0,
        "country": "prt",
        "market_segment": "Offline TA/TO",
        "distribution_channel": "TA/TO",
        "deposit_type": "No Deposit",
        "customer_type": "Transient-Party",
        "meal": "HB",
        "reserved_room_type": "D",
        "assigned_room_type": "E",
        "booking_changes": 0,
        "agent": 0,
        "days_in_waiting_list": 0,
        "required_car_parking_spaces": false,
        "total_of_special_requests": 2
    });
    let prediction = context().predict_json(&input).unwrap();
    assert_close(prediction.price, 171.08697196940741);
}

#[test]
fn unseen_country_falls_back_to_prior() {
    let record = BookingRecord { country: "ATA".to_string(), ..Default::default() };
    let prediction = context().predict(&record).unwrap();
    assert_close(prediction.price, 93.5756459003623);
    assert_eq!(prediction.fallback_columns, ["country"]);
}

#[test]
fn lower_case_country_prices_the_same_typed_or_json() {
    let ctx = context();
    let typed = ctx
        .predict(&BookingRecord { country: "usa".to_string(), ..Default::default() })
        .unwrap();
    let mut input = serde_json::to_value(BookingRecord::default()).unwrap();
    input["country"] = json!("usa");
    let parsed = ctx.predict_json(&input).unwrap();

    assert_eq!(typed, parsed);
    assert!(typed.fallback_columns.is_empty());
}

#[test]
fn explained_encoding_prices_like_predict() {
    let ctx = context();
    let encoding = ctx.explain(&resort_scenario()).unwrap();
    assert_eq!(
        ctx.predict_encoding(&encoding).unwrap(),
        ctx.predict(&resort_scenario()).unwrap()
    );
}

#[test]
fn identical_input_gives_identical_price() {
    let ctx = context();
    let a = ctx.predict(&resort_scenario()).unwrap();
    let b = ctx.predict(&resort_scenario()).unwrap();
    assert_eq!(a.price.to_bits(), b.price.to_bits());
    assert_eq!(ctx.explain(&resort_scenario()).unwrap(), ctx.explain(&resort_scenario()).unwrap());
}

#[test]
fn invalid_input_is_a_validation_error() {
    let ctx = context();
    let nobody = BookingRecord { adults: 0, ..Default::default() };
    assert_eq!(ctx.predict(&nobody).unwrap_err().kind(), ErrorKind::ValidationError);

    let bad_country = BookingRecord { country: "U5A".to_string(), ..Default::default() };
    assert_eq!(ctx.predict(&bad_country).unwrap_err().kind(), ErrorKind::ValidationError);

    let err = ctx.predict_json(&json!({"hotel": "City Hotel"})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn untyped_rows_surface_encoder_errors() {
    let ctx = context();

    let mut row = FeatureRow::from(&BookingRecord::default());
    row.insert("arrival_day_of_week", "Someday");
    assert_eq!(ctx.predict_row(row).unwrap_err().kind(), ErrorKind::ValidationError);

    let mut row = FeatureRow::from(&BookingRecord::default());
    row.remove("market_segment");
    assert_eq!(ctx.predict_row(row).unwrap_err().kind(), ErrorKind::SchemaMismatchError);
}

#[test]
fn model_width_must_match_schema() {
    let ctx = context();
    let narrow = PriceAdapter::new(Arc::new(ConstantRegressor { n_features: 3, value: 4.0 }));
    match ModelContext::new(ctx.encoder().clone(), narrow) {
        Err(EncodeError::SchemaMismatch { column, .. }) => assert_eq!(column, "*"),
        other => panic!("expected a schema mismatch, got {other:?}"),
    }

    let cfg = ArtifactConfig {
        model: PathBuf::from("narrow_model.json"),
        ..ArtifactConfig::with_dir(fixtures())
    };
    match ModelContext::load(&cfg) {
        Err(ArtifactError::Invalid { path, reason }) => {
            assert!(path.ends_with("narrow_model.json"));
            assert!(reason.contains("3 features"), "{reason}");
        }
        other => panic!("expected an invalid model artifact, got {other:?}"),
    }
}

#[test]
fn missing_artifacts_fail_to_load() {
    let err = ModelContext::load(&ArtifactConfig::with_dir(fixtures().join("missing"))).unwrap_err();
    assert!(matches!(err, ArtifactError::Io { .. }));

    let cfg = ArtifactConfig {
        encoder: PathBuf::from("model_columns.json"),
        ..ArtifactConfig::with_dir(fixtures())
    };
    assert!(matches!(ModelContext::load(&cfg), Err(ArtifactError::Parse { .. })));
}

#[test]
fn context_is_shared_across_threads() {
    let ctx = Arc::new(context());
    let expected = ctx.predict(&resort_scenario()).unwrap().price;
    thread::scope(|s| {
        for _ in 0..4 {
            let ctx = Arc::clone(&ctx);
            s.spawn(move || {
                let price = ctx.predict(&resort_scenario()).unwrap().price;
                assert_eq!(price.to_bits(), expected.to_bits());
            });
        }
    });
}

#[test]
fn service_counts_outcomes_per_kind() {
    let service = PredictionService::new(Arc::new(context()));
    let good = serde_json::to_string(&BookingRecord::default()).unwrap();
    let unseen = serde_json::to_string(&BookingRecord {
        country: "ATA".to_string(),
        ..Default::default()
    })
    .unwrap();

    assert!(service.predict_line(&good).is_ok());
    assert!(service.predict_line(&unseen).is_ok());
    assert!(service.predict_line("{not json").is_err());
    assert!(service.predict_json(&json!({"adults": 2})).is_err());

    let snap = service.metrics().snapshot();
    assert_eq!(snap.predictions, 2);
    assert_eq!(snap.fallback_lookups, 1);
    assert_eq!(snap.validation_errors, 2);
    assert_eq!(snap.failures(), 2);
}
