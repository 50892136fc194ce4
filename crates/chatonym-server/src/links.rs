//! Share links carrying tokens.
//!
//! Links point at the bot's `{bot}.t.me` host with the token in the query:
//! `?start=` for invitations, `?chat=` for reply tokens.

use url::{Url, form_urlencoded};

/// Query parameter carrying a start token.
pub const START_TOKEN_PARAM: &str = "start";

/// Query parameter carrying a chat token.
pub const CHAT_TOKEN_PARAM: &str = "chat";

const LINK_HOST: &str = "t.me";

/// Link to the bot with the given query pairs.
pub fn bot_link(bot: &str, query: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(query).finish();
    format!("https://{bot}.{LINK_HOST}?{query}")
}

/// Invitation link for a start token.
pub fn start_link(bot: &str, token: &str) -> String {
    bot_link(bot, &[(START_TOKEN_PARAM, token)])
}

/// Reply link for a chat token.
pub fn chat_link(bot: &str, token: &str) -> String {
    bot_link(bot, &[(CHAT_TOKEN_PARAM, token)])
}

/// Extract the chat token from a reply link.
///
/// Accepts only `https` links to this bot, either `https://t.me/{bot}` or
/// `https://{bot}.t.me/`, with a non-empty `chat` parameter. The bot name is
/// matched ASCII case-insensitively in both forms, as usernames are.
pub fn parse_chat_token(bot: &str, link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    if url.scheme() != "https" || url.port().is_some() {
        return None;
    }

    let token = url
        .query_pairs()
        .find(|(key, _)| key == CHAT_TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())?;

    let host = url.host_str()?;
    let path_style = host == LINK_HOST
        && url.path().strip_prefix('/').is_some_and(|name| name.eq_ignore_ascii_case(bot));
    let host_style =
        host.eq_ignore_ascii_case(&format!("{bot}.{LINK_HOST}")) && url.path() == "/";

    (path_style || host_style).then_some(token)
}
