//! Built-in pseudonym word lists.

/// Leading words.
pub const PREFIXES: &[&str] = &[
    "Amber", "Ancient", "Arctic", "Autumn", "Azure", "Bashful", "Bold", "Brave", "Breezy", "Bright",
    "Bronze", "Calm", "Candid", "Cheerful", "Clever", "Cobalt", "Cosmic", "Crimson", "Curious",
    "Dapper", "Daring", "Dusky", "Eager", "Electric", "Emerald", "Fancy", "Fearless", "Fluffy",
    "Frosty", "Gentle", "Gilded", "Glowing", "Golden", "Graceful", "Grumpy", "Happy", "Hidden",
    "Humble", "Icy", "Indigo", "Jolly", "Jovial", "Keen", "Kind", "Lively", "Lucky", "Lunar",
    "Mellow", "Merry", "Misty", "Modest", "Mossy", "Nimble", "Noble", "Olive", "Patient", "Peppy",
    "Plucky", "Polite", "Proud", "Quick", "Quiet", "Rapid", "Restless", "Rosy", "Rusty", "Sandy",
    "Scarlet", "Shy", "Silent", "Silver", "Sleepy", "Sly", "Snowy", "Solar", "Spry", "Steady",
    "Stormy", "Sunny", "Swift", "Tidy", "Tiny", "Twilight", "Velvet", "Vivid", "Wandering", "Wild",
    "Windy", "Wise", "Witty", "Zesty",
];

/// Trailing words.
pub const SUFFIXES: &[&str] = &[
    "Albatross", "Alpaca", "Antelope", "Badger", "Beaver", "Bison", "Bobcat", "Buffalo", "Camel",
    "Capybara", "Caribou", "Cheetah", "Chipmunk", "Cobra", "Condor", "Cougar", "Coyote", "Crane",
    "Crow", "Dingo", "Dolphin", "Dove", "Eagle", "Egret", "Elk", "Falcon", "Ferret", "Finch",
    "Flamingo", "Fox", "Gazelle", "Gecko", "Gibbon", "Giraffe", "Gopher", "Hare", "Hawk",
    "Hedgehog", "Heron", "Hippo", "Ibex", "Iguana", "Jackal", "Jaguar", "Kestrel", "Koala",
    "Lemur", "Leopard", "Lion", "Llama", "Lynx", "Magpie", "Mantis", "Marmot", "Marten", "Meerkat",
    "Mink", "Mole", "Moose", "Narwhal", "Newt", "Ocelot", "Octopus", "Opossum", "Orca", "Osprey",
    "Otter", "Owl", "Panda", "Panther", "Parrot", "Pelican", "Penguin", "Puffin", "Puma", "Quail",
    "Rabbit", "Raccoon", "Raven", "Salmon", "Seal", "Shark", "Sparrow", "Squid", "Stoat", "Swan",
    "Tapir", "Tiger", "Toucan", "Turtle", "Viper", "Vulture", "Walrus", "Weasel", "Whale", "Wolf",
    "Wombat", "Yak", "Zebra",
];
