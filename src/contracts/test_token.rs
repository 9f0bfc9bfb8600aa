//! Mintable test token interface (TACC / TBCC)
//! Only the subset of ERC20 the exchange front-end needs, plus the faucet `mint`
use ethers::prelude::*;

abigen!(
    ITestToken,
    r#"[
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 value) external returns (bool)
        function balanceOf(address account) external view returns (uint256)
        function mint(address to, uint256 amount) external
    ]"#,
);

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::AbiEncode;

    #[test]
    fn test_mint_call_encoding() {
        let call = MintCall {
            to: Address::repeat_byte(0xab),
            amount: U256::from(1000u64),
        };
        let encoded = call.encode();
        assert_eq!(encoded.len(), 4 + 32 * 2);
        assert_eq!(&encoded[4 + 12..4 + 32], Address::repeat_byte(0xab).as_bytes());
    }
}
