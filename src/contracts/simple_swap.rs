//! SimpleSwap exchange interface
//! The exchange contract is also the LP token for its single A/B pool
use ethers::prelude::*;

abigen!(
    ISimpleSwap,
    r#"[
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 value) external returns (bool)
        function balanceOf(address account) external view returns (uint256)
        function totalSupply() external view returns (uint256)
        function addLiquidity(address tokenA, address tokenB, uint256 amountADesired, uint256 amountBDesired, uint256 amountAMin, uint256 amountBMin, address to, uint256 deadline) external returns (uint256 amountA, uint256 amountB, uint256 liquidity)
        function removeLiquidity(address tokenA, address tokenB, uint256 liquidity, uint256 amountAMin, uint256 amountBMin, address to, uint256 deadline) external returns (uint256 amountA, uint256 amountB)
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external
        function getAmountOut(uint256 amountIn, uint256 reserveIn, uint256 reserveOut) external pure returns (uint256 amountOut)
        function getReserves(address tokenA, address tokenB) external view returns (uint256 reserveA, uint256 reserveB)
        event LiquidityAdded(address indexed tokenA, address indexed tokenB, uint256 amountA, uint256 amountB, uint256 liquidity)
        event LiquidityRemoved(address indexed tokenA, address indexed tokenB, uint256 amountA, uint256 amountB, uint256 liquidity)
        event Swap(address indexed tokenIn, address indexed tokenOut, uint256 amountIn, uint256 amountOut, address indexed to)
    ]"#,
);

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::AbiEncode;
    use ethers::contract::EthEvent;

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            SwapFilter::abi_signature(),
            "Swap(address,address,uint256,uint256,address)"
        );
        assert_eq!(
            LiquidityAddedFilter::abi_signature(),
            "LiquidityAdded(address,address,uint256,uint256,uint256)"
        );
        assert_eq!(
            LiquidityRemovedFilter::abi_signature(),
            "LiquidityRemoved(address,address,uint256,uint256,uint256)"
        );
    }

    #[test]
    fn test_get_reserves_call_encoding() {
        let call = GetReservesCall {
            token_a: Address::repeat_byte(0x11),
            token_b: Address::repeat_byte(0x22),
        };
        let encoded = call.encode();
        // 4-byte selector + two address words
        assert_eq!(encoded.len(), 4 + 32 * 2);
    }
}
