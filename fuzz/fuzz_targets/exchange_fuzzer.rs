//! Fuzz target for the relay flow
//!
//! Drives an `Exchange` over in-memory storage with arbitrary sequences of
//! invites, accepts, replies and terminations, mixing real tokens with
//! garbage. Checks that:
//! - No operation panics
//! - A delivered reply always targets one of the two conversation parties
//! - Once terminated, a conversation never delivers again

#![no_main]

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use arbitrary::Arbitrary;
use chatonym_core::{Environment, TokenConfig, TokenSuite};
use chatonym_server::{Accepted, Exchange, MemoryStorage, Relay, SecretStore};
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Default)]
struct FuzzEnv {
    counter: Arc<AtomicU64>,
}

impl Environment for FuzzEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = self.counter.fetch_add(1, Ordering::SeqCst) as u8;
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Invite { user: u8 },
    Accept { invitation: u8, opener: u8 },
    Reply { token: u8 },
    Terminate { token: u8 },
    Garbage(String),
}

fuzz_target!(|ops: Vec<Op>| {
    let env = FuzzEnv::default();
    let storage = MemoryStorage::new();
    let store = SecretStore::new(storage.clone(), env.clone(), 32, 32);
    let secrets = store.init().unwrap();
    let suite = TokenSuite::new(secrets, &TokenConfig::default(), env).unwrap();
    let exchange = Exchange::new(suite, storage, "fuzz_bot");

    let mut invitations: Vec<String> = Vec::new();
    let mut chat_tokens: Vec<String> = Vec::new();
    let mut terminated: HashSet<String> = HashSet::new();

    for op in ops.into_iter().take(64) {
        match op {
            Op::Invite { user } => {
                if let Some(invitation) = exchange.invite(i64::from(user)).unwrap() {
                    invitations.push(invitation.token);
                }
            },
            Op::Accept { invitation, opener } => {
                let Some(token) = pick(&invitations, invitation) else { continue };
                if let Accepted::Connected { reply_token, .. } =
                    exchange.accept(&token, i64::from(opener)).unwrap()
                {
                    chat_tokens.push(reply_token);
                }
            },
            Op::Reply { token } => {
                let Some(token) = pick(&chat_tokens, token) else { continue };
                let leg = exchange.suite().chat().decrypt(&token).unwrap().unwrap().tuple;
                let fingerprint = exchange.suite().fingerprinter().fingerprint(&leg);

                match exchange.reply(&token).unwrap() {
                    Relay::Deliver { recipient_id, reply_token, .. } => {
                        assert!(!terminated.contains(fingerprint.as_str()));
                        assert_eq!(recipient_id, leg.recipient_id);
                        chat_tokens.push(reply_token);
                    },
                    Relay::Terminated => assert!(terminated.contains(fingerprint.as_str())),
                    other => panic!("issued token rejected: {other:?}"),
                }
            },
            Op::Terminate { token } => {
                let Some(token) = pick(&chat_tokens, token) else { continue };
                let leg = exchange.suite().chat().decrypt(&token).unwrap().unwrap().tuple;
                assert!(exchange.terminate(&token).unwrap());
                terminated.insert(exchange.suite().fingerprinter().fingerprint(&leg).into_string());
            },
            Op::Garbage(text) => {
                let _ = exchange.accept(&text, 1);
                let _ = exchange.reply(&text);
                let _ = exchange.terminate(&text);
            },
        }
    }
});

fn pick(tokens: &[String], index: u8) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    tokens.get(usize::from(index) % tokens.len()).cloned()
}
