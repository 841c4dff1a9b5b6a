pub mod schema;
pub mod settings;

pub use schema::{
    page_size, FontFamily, FontSpec, LayoutConfig, LogoPlacement, LogoPosition, Margins,
    Orientation, PageFormat, Rgb,
};
pub use settings::{
    load_settings, read_settings, save_settings, LogoMode, UserSettings, DEFAULT_LOGO_PATH,
    DEFAULT_SETTINGS_PATH,
};
