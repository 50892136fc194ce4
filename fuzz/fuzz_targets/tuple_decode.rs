//! Fuzz target for StartTuple / ChatTuple deserialization
//!
//! Decrypted token bytes are attacker-influenced (the envelope is not
//! authenticated), so decoding must handle anything:
//! - Wrong lengths
//! - Identities outside the safe integer range
//!
//! The fuzzer should NEVER panic. Any tuple that decodes must re-encode to
//! the same bytes.

#![no_main]

use chatonym_core::{ChatTuple, StartTuple};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(start) = StartTuple::deserialize(data) {
        let bytes = start.serialize().unwrap();
        assert_eq!(&bytes[..], &data[..StartTuple::SIZE]);
    }

    if let Ok(chat) = ChatTuple::deserialize(data) {
        let bytes = chat.serialize().unwrap();
        assert_eq!(&bytes[..], data);
        assert_eq!(chat.rotated().rotated(), chat);
    }
});
