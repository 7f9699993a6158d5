/// Application name
pub const APP_NAME: &str = "StreamVerse";

/// Document store collections
pub const COLLECTION_PROFILES: &str = "users";
pub const COLLECTION_ENTITLEMENTS: &str = "subscriptions";
pub const COLLECTION_PAYMENTS: &str = "payments";
pub const COLLECTION_FAVORITES: &str = "favorites";

/// Premium monthly price in naira
pub const PREMIUM_PRICE: u32 = 2999;

/// Basic plan is free
pub const BASIC_PRICE: u32 = 0;

/// Upper bound (exclusive) for simulated transaction identifiers
pub const TRANSACTION_ID_BOUND: u64 = 1_000_000_000;

/// Minimum password length accepted by the identity provider
pub const MIN_PASSWORD_LEN: usize = 6;

/// Display name used when neither the profile nor the provider has one
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Catalog defaults (TMDB v3)
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Genre used for the "Action Hits" landing row
pub const ACTION_GENRE_ID: u32 = 28;

/// Detail page limits
pub const CAST_LIMIT: usize = 10;
pub const RELATED_LIMIT: usize = 12;

/// Hero trailer rotation period in seconds
pub const TRAILER_ROTATION_SECS: u64 = 10;

/// Simulated payment processing delay in milliseconds
pub const PAYMENT_DELAY_MS: u64 = 2000;
