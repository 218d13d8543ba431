//! Method id injection
//!
//! Get-methods declared with a bare `method_id` get their dispatch id from a
//! CRC-16/XMODEM of the function name with bit 16 set. This pass runs on the
//! raw source, before tokenization, and writes the computed id into the
//! declaration so the result no longer depends on the compiler's implicit
//! numbering. Declarations that already carry an id are only normalized.

use std::borrow::Cow;

use crc::{CRC_16_XMODEM, Crc};
use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Set on every computed id so it never collides with small hand-written ids
pub const COMPUTED_ID_FLAG: u32 = 0x1_0000;

/// `name(params) method_id[(id)] {`, also matching the camel `methodId` spelling
static METHOD_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\w?]+)\s*(\(.*?\))\s*(method_id|methodId)(?:\s*\(\s*(\d+)\s*\))?\s\{")
        .expect("method declaration regex is valid")
});

/// The id the compiler derives for a get-method named `name`
pub fn method_id_for(name: &str) -> u32 {
    (u32::from(XMODEM.checksum(name.as_bytes())) & 0xFFFF) | COMPUTED_ID_FLAG
}

/// Rewrite every get-method declaration to carry an explicit id
///
/// Text that does not match the declaration shape is left untouched. The
/// pass is idempotent: explicit ids are always kept as written.
pub fn inject(source: &str) -> Cow<'_, str> {
    METHOD_DECLARATION.replace_all(source, |caps: &Captures<'_>| {
        let name = &caps[1];
        let params = &caps[2];
        let keyword = &caps[3];
        let id = match caps.get(4) {
            Some(explicit) => explicit.as_str().to_owned(),
            None => {
                let computed = method_id_for(name);
                trace!("Computed method id {computed} for '{name}'");
                computed.to_string()
            }
        };
        format!("{name}{params} {keyword}({id}) {{")
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_known_checksums() {
        // CRC-16/XMODEM check value
        assert_eq!(method_id_for("123456789"), 0x31C3 | COMPUTED_ID_FLAG);
        // Well-known TON get-method ids
        assert_eq!(method_id_for("seqno"), 85143);
        assert_eq!(method_id_for("get_wallet_data"), 97026);
    }

    #[test]
    fn test_injects_computed_id() {
        assert_eq!(
            inject("foo(int a) method_id {"),
            "foo(int a) method_id(110486) {"
        );
        assert_eq!(
            inject("int seqno() method_id {\n  return 0;\n}"),
            "int seqno() method_id(85143) {\n  return 0;\n}"
        );
    }

    #[test]
    fn test_injection_is_idempotent() {
        let once = inject("foo(int a) method_id {").into_owned();
        let twice = inject(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_explicit_id_is_kept_and_normalized() {
        assert_eq!(
            inject("int seqno()method_id( 7 ) {"),
            "int seqno() method_id(7) {"
        );
    }

    #[test]
    fn test_camel_spelling() {
        assert_eq!(
            inject("int getBalance() methodId {"),
            "int getBalance() methodId(106323) {"
        );
    }

    #[test]
    fn test_multiple_declarations() {
        let source = "int seqno() method_id {\n}\n\nint get_balance() method_id {\n}\n";
        assert_eq!(
            inject(source),
            "int seqno() method_id(85143) {\n}\n\nint get_balance() method_id(130343) {\n}\n"
        );
    }

    #[test]
    fn test_unmatched_shapes_pass_through() {
        for source in [
            // no whitespace before the body
            "int seqno() method_id{",
            // parameter list split over lines
            "int f(int a,\n int b) method_id {",
            // plain function
            "int f(int a) inline {",
        ] {
            assert!(matches!(inject(source), Cow::Borrowed(_)), "{source}");
        }
    }
}
