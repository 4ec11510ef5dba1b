//! Route paths.

pub const POST_API_CHAT: &str = "/api/chat";
pub const GET_API_CHAT_SESSION_ID: &str = "/api/chat/{session_id}";
pub const GET_API_EMBED: &str = "/api/embed";
pub const GET_API_HEALTH: &str = "/api/health";
