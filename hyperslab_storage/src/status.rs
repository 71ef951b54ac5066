//! Native status codes.
//!
//! A store reports failures with a negative status code, and zero for success.
//! The codes are those of the store library, so that a status surfaced to a caller can be looked up in its documentation.

/// No error.
pub const NO_ERROR: i32 = 0;
/// Not a valid identifier.
pub const BAD_ID: i32 = -33;
/// Invalid argument.
pub const INVALID_ARGUMENT: i32 = -36;
/// Write to read only.
pub const PERMISSION: i32 = -37;
/// Index exceeds dimension bound.
pub const INVALID_COORDS: i32 = -40;
/// Name in use.
pub const NAME_IN_USE: i32 = -42;
/// Attribute not found.
pub const NOT_ATTRIBUTE: i32 = -43;
/// Not a valid data type.
pub const BAD_TYPE: i32 = -45;
/// Invalid dimension identifier.
pub const BAD_DIMENSION: i32 = -46;
/// Variable not found.
pub const NOT_VARIABLE: i32 = -49;
/// Attempt to convert between text and numbers.
pub const CHAR_CONVERSION: i32 = -56;
/// Start plus count exceeds dimension bound.
pub const EDGE: i32 = -57;
/// Illegal stride.
pub const STRIDE: i32 = -58;
/// Numeric conversion not representable.
pub const RANGE: i32 = -60;

/// Return the message for a native status code.
#[must_use]
pub fn message(status: i32) -> &'static str {
    match status {
        NO_ERROR => "no error",
        BAD_ID => "not a valid id",
        INVALID_ARGUMENT => "invalid argument",
        PERMISSION => "write to read only",
        INVALID_COORDS => "index exceeds dimension bound",
        NAME_IN_USE => "string match to name in use",
        NOT_ATTRIBUTE => "attribute not found",
        BAD_TYPE => "not a valid data type",
        BAD_DIMENSION => "invalid dimension id or name",
        NOT_VARIABLE => "variable not found",
        CHAR_CONVERSION => "attempt to convert between text & numbers",
        EDGE => "start+count exceeds dimension bound",
        STRIDE => "illegal stride",
        RANGE => "numeric conversion not representable",
        _ => "unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages() {
        assert_eq!(message(NO_ERROR), "no error");
        assert_eq!(message(RANGE), "numeric conversion not representable");
        assert_eq!(message(-1000), "unknown error");
    }
}
