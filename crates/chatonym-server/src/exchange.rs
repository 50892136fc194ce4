//! The relay's request flow, without a messaging transport.
//!
//! Each operation takes the tokens and user ids a bot would extract from an
//! incoming message and returns what the bot should do next. Identity pairs
//! are never stored: they are recovered from tokens, checked against the
//! termination ledger by fingerprint, and re-sealed for the other party.
//!
//! ```text
//! invite(A)            -> start link for A
//! accept(start, B)     -> chat token (B -> A) for B, A's pseudonym for B
//! reply(chat B -> A)   -> deliver to A with chat token (A -> B)
//! terminate(chat)      -> fingerprint recorded, both directions blocked
//! ```

use chatonym_core::{ChatTuple, Environment, Fingerprint, TokenSuite};

use crate::{error::ServerError, links, storage::Storage};

/// A freshly issued invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    /// The start token
    pub token: String,
    /// Share link carrying the token
    pub link: String,
}

/// Outcome of opening an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accepted {
    /// The token is not a valid invitation, or the opener invited themself.
    Rejected,
    /// The conversation was terminated.
    Terminated,
    /// The reply token could not be sealed.
    Failed,
    /// A conversation is open.
    Connected {
        /// Token the opener uses to write to the inviter
        reply_token: String,
        /// Share link carrying `reply_token`
        reply_link: String,
        /// Name under which the opener sees the inviter
        inviter_pseudonym: String,
    },
}

/// Outcome of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    /// The chat token could not be decrypted.
    Invalid,
    /// The conversation was terminated.
    Terminated,
    /// The counterpart's token could not be sealed.
    Failed,
    /// Deliver the message.
    Deliver {
        /// Who receives the message
        recipient_id: i64,
        /// Token the recipient uses to answer
        reply_token: String,
        /// Share link carrying `reply_token`
        reply_link: String,
        /// Name under which the recipient sees the sender
        sender_pseudonym: String,
    },
}

/// Ties the token suite to the termination ledger.
pub struct Exchange<S: Storage, E: Environment> {
    suite: TokenSuite<E>,
    storage: S,
    bot: String,
}

impl<S: Storage, E: Environment> Exchange<S, E> {
    /// Create an exchange issuing links for `bot`.
    pub fn new(suite: TokenSuite<E>, storage: S, bot: impl Into<String>) -> Self {
        Self { suite, storage, bot: bot.into() }
    }

    /// The token components.
    pub fn suite(&self) -> &TokenSuite<E> {
        &self.suite
    }

    /// Issue an invitation link for `user_id`.
    ///
    /// Re-inviting within the cache lifetime returns the same link. `None`
    /// means the token could not be sealed.
    pub fn invite(&self, user_id: i64) -> Result<Option<Invitation>, ServerError> {
        let Some(token) = self.suite.start().encrypt(user_id)? else {
            tracing::warn!("could not issue start token");
            return Ok(None);
        };

        let link = links::start_link(&self.bot, &token);
        Ok(Some(Invitation { token, link }))
    }

    /// Open an invitation on behalf of `opener_id`.
    pub fn accept(&self, start_token: &str, opener_id: i64) -> Result<Accepted, ServerError> {
        let Some(invitation) = self.suite.start().decrypt(start_token)? else {
            return Ok(Accepted::Rejected);
        };

        if invitation.tuple.recipient_id == opener_id {
            tracing::debug!("opener invited themself");
            return Ok(Accepted::Rejected);
        }

        let chat = ChatTuple::try_new(
            opener_id,
            invitation.tuple.recipient_id,
            i64::from(invitation.tuple.seed),
        )?;

        if self.is_terminated(&chat)? {
            return Ok(Accepted::Terminated);
        }

        let Some(reply_token) = self.suite.chat().encrypt(&chat)? else {
            return Ok(Accepted::Failed);
        };

        Ok(Accepted::Connected {
            reply_link: links::chat_link(&self.bot, &reply_token),
            reply_token,
            inviter_pseudonym: self.suite.pseudonyms().pseudonym_for_recipient(&chat),
        })
    }

    /// Relay a message written against `chat_token`.
    pub fn reply(&self, chat_token: &str) -> Result<Relay, ServerError> {
        let Some(leg) = self.suite.chat().decrypt(chat_token)? else {
            return Ok(Relay::Invalid);
        };
        let chat = leg.tuple;

        if self.is_terminated(&chat)? {
            return Ok(Relay::Terminated);
        }

        let Some(reply_token) = self.suite.chat().encrypt_rotated(&chat)? else {
            return Ok(Relay::Failed);
        };

        Ok(Relay::Deliver {
            recipient_id: chat.recipient_id,
            reply_link: links::chat_link(&self.bot, &reply_token),
            reply_token,
            sender_pseudonym: self.suite.pseudonyms().pseudonym(&chat),
        })
    }

    /// Relay a message written against a reply link.
    pub fn reply_to_link(&self, chat_link: &str) -> Result<Relay, ServerError> {
        match links::parse_chat_token(&self.bot, chat_link) {
            Some(token) => self.reply(&token),
            None => Ok(Relay::Invalid),
        }
    }

    /// Terminate the conversation `chat_token` belongs to.
    ///
    /// Returns false if the token could not be decrypted. Terminating twice
    /// succeeds both times.
    pub fn terminate(&self, chat_token: &str) -> Result<bool, ServerError> {
        let Some(leg) = self.suite.chat().decrypt(chat_token)? else {
            return Ok(false);
        };

        self.storage.terminate(&self.fingerprint(&leg.tuple))?;
        tracing::info!("conversation terminated");
        Ok(true)
    }

    fn fingerprint(&self, chat: &ChatTuple) -> Fingerprint {
        self.suite.fingerprinter().fingerprint(chat)
    }

    fn is_terminated(&self, chat: &ChatTuple) -> Result<bool, ServerError> {
        Ok(self.storage.is_terminated(&self.fingerprint(chat))?)
    }
}
