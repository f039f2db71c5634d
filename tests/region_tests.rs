//! Integration tests for the bot's view of the shared region

mod common;

use common::{food, segment, Fixture};
use serde::{Deserialize, Serialize};
use spnbot::{
    layout::{
        COLOR_COUNT_OFFSET, COLOR_MAX_COUNT, COLOR_RECORDS_OFFSET, COLOR_STRIDE, LOG_OFFSET,
        PERSISTENT_MAX_BYTES, PERSISTENT_OFFSET,
    },
    BotApi, BotError, Color, RegionConfig, SharedMemoryRegion,
};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_region_smaller_than_layout() {
        let fixture = Fixture::new();
        let config = RegionConfig::file(fixture.dir.path().join("small"), 4096);
        let region = Arc::new(SharedMemoryRegion::new(config).unwrap());

        match BotApi::new(region) {
            Err(BotError::RegionTooSmall { required, actual }) => {
                assert_eq!(required, 2_180_200);
                assert_eq!(actual, 4096);
            }
            other => panic!("expected RegionTooSmall, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_scalar_blocks_are_read_live() {
        let fixture = Fixture::new();
        let api = fixture.api();

        fixture.server.set_server_u32(0, 8);
        fixture.server.set_server_f32(13, 100.0);
        fixture.server.set_self_f32(1, 42.5);
        fixture.server.set_self_u32(5, 7);

        assert_eq!(api.server_config().snake_boost_steps(), 8);
        assert_eq!(api.server_config().log_max_credits(), 100.0);
        assert_eq!(api.self_info().mass(), 42.5);
        assert_eq!(api.self_info().current_frame(), 7);

        fixture.server.set_self_u32(5, 8);
        assert_eq!(api.self_info().current_frame(), 8);
        assert_eq!(api.self_info().snapshot().current_frame, 8);
    }

    #[test]
    fn test_food_view_follows_server_writes() {
        let fixture = Fixture::new();
        let api = fixture.api();
        assert!(api.food().is_empty());

        fixture.server.set_food(&[food(1.0, 2.0, 0.5, 0.1, 2.2), food(-3.0, 4.0, 1.5, 2.0, 5.0)]);
        assert_eq!(api.food().len(), 2);
        assert_eq!(api.food().get(1).unwrap(), food(-3.0, 4.0, 1.5, 2.0, 5.0));
        assert!(matches!(api.food().get(2), Err(BotError::OutOfRange { index: 2, length: 2 })));

        fixture.server.set_food_count(1);
        let collected: Vec<_> = api.food().iter().collect();
        assert_eq!(collected, vec![food(1.0, 2.0, 0.5, 0.1, 2.2)]);
    }

    #[test]
    fn test_oversized_count_is_clamped() {
        let fixture = Fixture::new();
        let api = fixture.api();

        fixture.server.set_segment_count(u32::MAX);
        assert_eq!(api.segments().raw_count(), u32::MAX);
        assert_eq!(api.segments().len(), api.segments().capacity());
    }

    #[test]
    fn test_bots_and_segments() {
        let fixture = Fixture::new();
        let api = fixture.api();

        let long_name = "x".repeat(80);
        fixture.server.set_bots(&[(11, "alpha"), (12, long_name.as_str())]);
        fixture.server.set_segments(&[segment(3.0, 0, 11, false), segment(4.0, 5, 12, true)]);

        let bots = api.bots().to_vec();
        assert_eq!(bots[0].bot_id, 11);
        assert_eq!(bots[0].bot_name, "alpha");
        assert_eq!(bots[1].bot_name.len(), 64);

        let segments = api.segments().to_vec();
        assert_eq!(segments, vec![segment(3.0, 0, 11, false), segment(4.0, 5, 12, true)]);
    }

    #[test]
    fn test_colors_are_visible_to_server() {
        let fixture = Fixture::new();
        let mut api = fixture.api();

        api.clear_colors();
        api.add_color(255, 0, 0);
        api.add_colors([Color::new(0, 255, 0), Color::new(0, 0, 255)]);

        assert_eq!(fixture.server.read(COLOR_COUNT_OFFSET, 4), 3u32.to_le_bytes().to_vec());
        assert_eq!(
            fixture.server.read(COLOR_RECORDS_OFFSET, 12),
            vec![255, 0, 0, 0, 0, 255, 0, 0, 0, 0, 255, 0]
        );
        assert_eq!(api.colors().get(2).unwrap(), Color::new(0, 0, 255));
    }

    #[test]
    fn test_color_pattern_caps_at_capacity() {
        let fixture = Fixture::new();
        let mut api = fixture.api();

        fixture.server.write(LOG_OFFSET, b"sentinel\0");

        api.clear_colors();
        for i in 0..COLOR_MAX_COUNT {
            api.add_color(i as u8, 0, 0);
        }
        assert!(api.colors().is_full());

        api.add_color(9, 9, 9);
        assert_eq!(api.colors().len(), COLOR_MAX_COUNT);
        let stored = fixture.server.read(COLOR_COUNT_OFFSET, 4);
        assert_eq!(stored, (COLOR_MAX_COUNT as u32).to_le_bytes().to_vec());
        assert_eq!(api.colors().get(COLOR_MAX_COUNT - 1).unwrap(), Color::new(255, 0, 0));

        // The slot past the array belongs to the log
        assert_eq!(COLOR_RECORDS_OFFSET + COLOR_MAX_COUNT * COLOR_STRIDE, LOG_OFFSET);
        assert_eq!(fixture.server.log_message(), b"sentinel");

        api.clear_colors();
        assert!(api.colors().is_empty());
    }

    #[test]
    fn test_cloned_pattern_shares_the_stored_count() {
        let fixture = Fixture::new();
        let mut api = fixture.api();

        api.clear_colors();
        api.add_color(1, 1, 1);
        let mut copy = api.colors().clone();
        copy.append(2, 2, 2);
        api.add_color(3, 3, 3);

        let pattern: Vec<_> = api.colors().iter().collect();
        assert_eq!(pattern, vec![Color::new(1, 1, 1), Color::new(2, 2, 2), Color::new(3, 3, 3)]);
        assert_eq!(copy.len(), 3);

        copy.clear();
        assert!(api.colors().is_empty());
        api.add_color(4, 4, 4);
        assert_eq!(copy.get(0).unwrap(), Color::new(4, 4, 4));
    }

    #[test]
    fn test_restarted_bot_resumes_server_pattern() {
        let fixture = Fixture::new();
        fixture.server.write(COLOR_RECORDS_OFFSET, &[1, 2, 3, 0, 4, 5, 6, 0]);
        fixture.server.write(COLOR_COUNT_OFFSET, &2u32.to_le_bytes());

        let mut api = fixture.api();
        assert_eq!(api.colors().len(), 2);
        api.add_color(7, 8, 9);
        drop(api);

        let api = fixture.api();
        let pattern: Vec<_> = api.colors().iter().collect();
        assert_eq!(pattern, vec![Color::new(1, 2, 3), Color::new(4, 5, 6), Color::new(7, 8, 9)]);
    }

    #[test]
    fn test_persistent_memory_bounds() {
        let fixture = Fixture::new();
        let mut api = fixture.api();

        api.write_persistent_memory(PERSISTENT_MAX_BYTES - 4, &[1, 2, 3, 4]).unwrap();
        let tail = PERSISTENT_MAX_BYTES - 4;
        assert_eq!(fixture.server.read(PERSISTENT_OFFSET + tail, 4), vec![1, 2, 3, 4]);
        assert_eq!(api.read_persistent_memory(tail, 4).unwrap(), vec![1, 2, 3, 4]);

        assert!(matches!(
            api.write_persistent_memory(PERSISTENT_MAX_BYTES - 3, &[0; 4]),
            Err(BotError::OutOfBounds { .. })
        ));
        assert!(api.read_persistent_memory(usize::MAX, 2).is_err());
        assert!(api.read_persistent_memory(PERSISTENT_MAX_BYTES, 0).unwrap().is_empty());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Memory {
        deaths: u32,
        favourite_heading: f32,
        enemies: Vec<u64>,
    }

    #[test]
    fn test_structured_state_survives_reattach() {
        let fixture = Fixture::new();
        let mut api = fixture.api();
        assert_eq!(api.persistent_memory().load::<Memory>().unwrap(), None);

        let memory = Memory {
            deaths: 3,
            favourite_heading: 0.75,
            enemies: vec![11, 12],
        };
        api.persistent_memory_mut().save(&memory).unwrap();
        drop(api);

        let mut api = fixture.api();
        assert_eq!(api.persistent_memory().load::<Memory>().unwrap(), Some(memory));

        // Corrupt one payload byte
        let byte = fixture.server.read(PERSISTENT_OFFSET + 8, 1)[0];
        fixture.server.write(PERSISTENT_OFFSET + 8, &[byte ^ 0xff]);
        assert!(matches!(
            api.persistent_memory().load::<Memory>(),
            Err(BotError::Checksum { .. })
        ));

        api.persistent_memory_mut().forget().unwrap();
        assert_eq!(api.persistent_memory().load::<Memory>().unwrap(), None);
    }

    #[test]
    fn test_log_slot() {
        let fixture = Fixture::new();
        let mut api = fixture.api();

        assert!(api.log("hello server"));
        assert_eq!(fixture.server.log_message(), b"hello server");

        assert!(api.log("hi"));
        assert_eq!(fixture.server.log_message(), b"hi");

        assert!(!api.log("x".repeat(1024)));
        assert_eq!(fixture.server.log_message(), b"hi");

        assert!(api.log("y".repeat(1023)));
        assert_eq!(fixture.server.log_message().len(), 1023);
    }

    #[test]
    fn test_face_and_dog_tag_are_local() {
        let fixture = Fixture::new();
        let mut api = fixture.api();
        api.set_face_id(4);
        api.set_dog_tag_id(9);
        assert_eq!(api.face_id(), 4);
        assert_eq!(api.dog_tag_id(), 9);
        assert_eq!(fixture.server.read(spnbot::layout::FACE_ID_OFFSET, 8), vec![0; 8]);
    }
}
