// Colors
pub const DARK_BUT_NOT_BLACK: u32 = 0x2C2F33;
pub const BLURPLE: u32 = 0x5865F2;
pub const RED: u32 = 0xED4245;
pub const YELLOW: u32 = 0xFEE75C;
pub const GREEN: u32 = 0x57F287;
pub const BLUE: u32 = 0x3498DB;

// Emojis
pub const EMOJI_ERROR: &str = ":x:";
pub const EMOJI_WARNING: &str = ":warning:";
pub const EMOJI_SUCCESS: &str = ":white_check_mark:";
pub const EMOJI_INFO: &str = ":information_source:";

// Discord limits
pub const DESCRIPTION_SIZE: usize = 4096;

// Command prefix
pub const PREFIX: char = '.';

// Message responses
pub const GENERAL_ISSUE: &str = "Something went wrong, blame the developer";
pub const NOT_OWNER: &str = "This ain't yours bucko, hands off!";
pub const NO_DATA: &str = "No data to be shown.";
pub const JUMP_PROMPT_EXPIRED: &str = "Modal timed out. Please try again.";
pub const JUMP_PROMPT_STALE: &str = "This prompt is no longer active, press the page button again.";
