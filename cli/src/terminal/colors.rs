use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 102, g: 217, b: 239 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 214, g: 214, b: 214 };

pub const STATUS_SUCCESS: Color = Color::Green;
pub const STATUS_REDIRECT: Color = Color::Cyan;
pub const STATUS_CLIENT_ERROR: Color = Color::Yellow;
pub const STATUS_SERVER_ERROR: Color = Color::Red;
pub const STATUS_INFORMATIONAL: Color = Color::Blue;
pub const CONNECTION_ERROR: Color = Color::BrightBlack;
pub const TIMEOUT: Color = Color::Magenta;
