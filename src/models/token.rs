#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub name: &'static str,
    pub address: &'static str,
    // chain id as the pricing provider spells it
    pub chain: &'static str,
}

pub const TRACKED_TOKENS: &[Token] = &[
    Token {
        name: "Ethereum",
        address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        chain: "eth",
    },
    Token {
        name: "Polygon",
        address: "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619",
        chain: "polygon",
    },
];

/// Ticks and alerts are both keyed on this form of the chain name.
pub fn chain_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn tracked_chains() -> Vec<String> {
    TRACKED_TOKENS.iter().map(|t| chain_key(t.name)).collect()
}
