//! Fixed test identities for deterministic tests

// Usernames
pub const TEST_USER_ALICE: &str = "alice";
pub const TEST_USER_BOB: &str = "bob";
pub const TEST_USER_CAROL: &str = "carol";

// Rooms
pub const TEST_ROOM_LOBBY: &str = "lobby";
pub const TEST_ROOM_URL: &str = "wss://media.test.invalid";

// Track ids
pub const TEST_TRACK_LOCAL_AUDIO: &str = "TR_local_audio";
pub const TEST_TRACK_LOCAL_VIDEO: &str = "TR_local_video";
