/// Sigil opening a header line.
pub const HEADER_SIGIL: char = '*';

/// Sigil opening a detail line.
pub const DETAIL_SIGIL: char = '|';

/// Timestamp layout used by the trace dump, e.g. `2016-03-24-09:18:46.359427942`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S%.f";

/// Timestamp layout used when printing, always microsecond precision.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d-%H:%M:%S%.6f";

/// Fraction digits kept from the dump's nanosecond timestamps.
pub const TIMESTAMP_FRACTION_DIGITS: usize = 6;

/// Detail key carrying the task (FOM) address.
pub const DETAIL_FOM: &str = "fom";

/// Detail key carrying the worker group (locality) index.
pub const DETAIL_LOCALITY: &str = "locality";

/// Scheduling state that ends a task's life.
pub const TERMINAL_STATE: &str = "Finished";
