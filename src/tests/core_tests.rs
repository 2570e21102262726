use crate::tests::test_utils::{
    assert_strictly_increasing, assert_unique_ids, config_with_epoch, FixedClock, SequenceClock,
};
use crate::layout::MAX_TIMESTAMP_DELTA;
use crate::*;

#[test]
fn test_first_ids_at_fixed_millisecond() {
    let generator = Snowflake::with_clock(config_with_epoch(0), FixedClock(1));

    assert_eq!(generator.next_id().unwrap(), pack(1, 1, 1, 0));
    assert_eq!(generator.next_id().unwrap(), pack(1, 1, 1, 1));
}

#[test]
fn test_epoch_is_subtracted() {
    let epoch = 1_288_834_974_657;
    let generator = Snowflake::with_clock(config_with_epoch(epoch), FixedClock(epoch + 250));

    let id = generator.next_id().unwrap();
    let parts = unpack(id);
    assert_eq!(parts.delta_millis, 250);
    assert_eq!(generator.extract().timestamp_millis(id), epoch + 250);
}

#[test]
fn test_explicit_construction_is_validated() {
    assert!(Snowflake::new(0, 0).is_ok());
    assert!(Snowflake::new(31, 31).is_ok());

    assert_eq!(
        Snowflake::new(32, 0).unwrap_err(),
        SnowflakeError::InvalidWorkerId {
            worker_id: 32,
            max: 31
        }
    );
    assert_eq!(
        Snowflake::new(0, 32).unwrap_err(),
        SnowflakeError::InvalidDataCenterId {
            data_center_id: 32,
            max: 31
        }
    );
    assert_eq!(
        Snowflake::with_options(1, 1, 0, 0).unwrap_err(),
        SnowflakeError::InvalidCacheSize {
            cache_size: 0,
            max: MAX_CACHE_SIZE
        }
    );
    assert_eq!(
        Snowflake::with_options(1, 1, -1, 10).unwrap_err(),
        SnowflakeError::InvalidEpoch { epoch: -1 }
    );

    let generator = Snowflake::with_options(3, 4, 0, 512).unwrap();
    assert_eq!(generator.worker_id(), 3);
    assert_eq!(generator.data_center_id(), 4);
    assert_eq!(generator.config().epoch(), 0);
    assert_eq!(generator.config().cache_size(), 512);
}

#[test]
fn test_clock_before_epoch_is_refused() {
    let epoch = 2000;
    let generator =
        Snowflake::with_clock(config_with_epoch(epoch), SequenceClock::new([1999, 2000]));

    assert_eq!(
        generator.next_id().unwrap_err(),
        SnowflakeError::TimestampOutOfRange { now: 1999, epoch }
    );
    // the refused reading leaves no state behind
    let first = generator.next_id().unwrap();
    assert_eq!(first, pack(0, 1, 1, 0));
    assert_strictly_increasing(&[first, generator.next_id().unwrap()]);

    let tolerant =
        Snowflake::with_clock(config_with_epoch(epoch), SequenceClock::new([1999, 2000]));
    assert_eq!(
        tolerant.next_id_tolerant().unwrap_err(),
        SnowflakeError::TimestampOutOfRange { now: 1999, epoch }
    );
    assert_eq!(tolerant.next_id_tolerant().unwrap(), pack(0, 1, 1, 0));
}

#[test]
fn test_timestamp_beyond_41_bits_is_refused() {
    let last = Snowflake::with_clock(config_with_epoch(0), FixedClock(MAX_TIMESTAMP_DELTA));
    let id = last.next_id().unwrap();
    assert!(id > 0);
    assert_eq!(unpack(id).delta_millis, MAX_TIMESTAMP_DELTA);
    assert_eq!(
        unpack(last.next_id_tolerant().unwrap()).delta_millis,
        MAX_TIMESTAMP_DELTA
    );

    let past = Snowflake::with_clock(config_with_epoch(0), FixedClock(MAX_TIMESTAMP_DELTA + 1));
    let expected = SnowflakeError::TimestampOutOfRange {
        now: MAX_TIMESTAMP_DELTA + 1,
        epoch: 0,
    };
    assert_eq!(past.next_id().unwrap_err(), expected);
    assert_eq!(past.next_id_tolerant().unwrap_err(), expected);
    assert!(!expected.is_configuration());
}

#[test]
fn test_node_ids_stamped_into_every_id() {
    let generator = Snowflake::new(17, 9).unwrap();
    let extract = generator.extract();

    for _ in 0..100 {
        let id = generator.next_id().unwrap();
        assert_eq!(extract.worker_id(id), 17);
        assert_eq!(extract.data_center_id(id), 9);
    }
}

#[test]
fn test_sequential_ids_strictly_increase() {
    let generator = Snowflake::new(1, 1).unwrap();
    let ids: Vec<i64> = (0..10_000).map(|_| generator.next_id().unwrap()).collect();

    assert_strictly_increasing(&ids);
    assert_unique_ids(&ids, ids.len());
    assert!(ids.iter().all(|&id| id >= 0));
}

#[test]
fn test_tolerant_path_strictly_increases_without_regression() {
    let generator = Snowflake::new(1, 1).unwrap();
    let ids: Vec<i64> = (0..10_000)
        .map(|_| generator.next_id_tolerant().unwrap())
        .collect();

    assert_strictly_increasing(&ids);
}

#[test]
fn test_wall_clock_ids_decode_to_now() {
    let generator = Snowflake::new(1, 1).unwrap();
    let before = SystemClock.now_millis();
    let id = generator.next_id().unwrap();
    let after = SystemClock.now_millis();

    let issued = generator.extract().datetime(id).unwrap().timestamp_millis();
    assert!(issued >= before && issued <= after);
}

#[test]
fn test_next_id_with_dispatches_by_path() {
    let generator = Snowflake::with_clock(config_with_epoch(0), SequenceClock::new([1000, 900]));
    assert!(generator.next_id_with(GenerationPath::default()).is_ok());

    // The strict path saw 1000; its tolerant sibling has its own state and
    // starts fresh at 900.
    let id = generator
        .next_id_with(GenerationPath::ClockBackTolerant)
        .unwrap();
    assert_eq!(unpack(id).delta_millis, 900);
}
