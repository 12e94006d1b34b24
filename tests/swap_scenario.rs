//! Chained swap scenario against a local mainnet fork.
//!
//! deploy → deposit ETH → wrap to WETH → WETH→USDC (Uniswap V3)
//!        → USDC→USDT (Sushiswap) → USDT to an EOA
//!
//! Steps run in order on one [`SwapScenario`]; the first failure aborts the
//! run so no dependent step executes. The scenario moves real fork state and
//! is expected to fail when run twice against the same fork.
//!
//! Needs: a node at `url.localhost` forking mainnet, `PRIVATE_KEY` and
//! `ACCOUNT` (e.g. in `.env.main`), and solc 0.8.17 on PATH.
//!
//! ```text
//! anvil --fork-url https://mainnet.infura.io/v3/$RPC_API_KEY
//! cargo test --test swap_scenario -- --ignored
//! ```

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;

use evm_toolbelt::blockchain::types::{ether_to_wei, parse_address, ChainResult};
use evm_toolbelt::ContractBinding;

mod common;

use common::SwapScenario;

const DEPOSIT_ETHER: u64 = 10;
const UNISWAP_POOL_FEE: u64 = 3000;

fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

/// Deploy Swap and check ACCOUNT owns it.
async fn deploy(ctx: &mut SwapScenario) -> ChainResult<()> {
    let (address, abi) = ctx.connection.deploy("Swap", None, None).await?;
    let swap = ContractBinding::with_abi(ctx.connection.clone(), address, abi);

    let owner = swap.owner().await?;
    assert_eq!(owner, ctx.account, "Owner of deployed Swap contract is not expected owner");

    ctx.swap = Some(swap);
    Ok(())
}

/// The contract receives ETH from its owner.
async fn deposit(ctx: &mut SwapScenario) -> ChainResult<()> {
    let swap = ctx.swap().address();
    assert_eq!(ctx.connection.get_native_balance(swap).await?, U256::ZERO);

    ctx.connection.transfer(ctx.account, swap, DEPOSIT_ETHER).await?;

    let balance = ctx.connection.get_native_balance(swap).await?;
    assert_eq!(balance, ether_to_wei(DEPOSIT_ETHER));
    assert_eq!(balance, U256::from(10u128 * 10u128.pow(18)));
    Ok(())
}

/// Native ETH is wrapped by depositing into the WETH contract.
async fn wrap_eth(ctx: &mut SwapScenario) -> ChainResult<()> {
    let swap = ctx.swap();
    let weth = &ctx.tokens.weth;
    let value = ether_to_wei(5);

    let before = weth.balance_of(swap.address()).await?;
    swap.transact("transfer", &[DynSolValue::Address(weth.address()), uint(value)])
        .await?;
    let after = weth.balance_of(swap.address()).await?;

    assert_eq!(
        after - before,
        value,
        "Difference in WETH value of Swap contract not equal to deposited value"
    );
    Ok(())
}

async fn swap_weth_usdc_uniswap(ctx: &mut SwapScenario) -> ChainResult<()> {
    let swap = ctx.swap();
    let router = ctx.connection.config().router("uniswapv3")?;
    let usdc = &ctx.tokens.usdc;

    let before = usdc.balance_of(swap.address()).await?;
    swap.transact(
        "swapUniV3",
        &[
            DynSolValue::Address(router),
            DynSolValue::Address(ctx.tokens.weth.address()),
            DynSolValue::Address(usdc.address()),
            DynSolValue::Uint(U256::from(UNISWAP_POOL_FEE), 24),
            uint(ether_to_wei(1)),
        ],
    )
    .await?;
    let after = usdc.balance_of(swap.address()).await?;

    // USDC and USDT use 6 decimals
    assert!(after > before, "USDC balance not increased");
    Ok(())
}

async fn swap_usdc_usdt_sushiswap(ctx: &mut SwapScenario) -> ChainResult<()> {
    let swap = ctx.swap();
    let router = ctx.connection.config().router("sushiswap")?;
    let usdc_balance = ctx.tokens.usdc.balance_of(swap.address()).await?;

    let before = ctx.tokens.usdt.balance_of(swap.address()).await?;
    assert_eq!(before, U256::ZERO, "USDT balance of contract not zero pre swap");

    swap.transact(
        "swapUniV2",
        &[
            DynSolValue::Address(router),
            DynSolValue::Address(ctx.tokens.usdc.address()),
            DynSolValue::Address(ctx.tokens.usdt.address()),
            uint(usdc_balance),
        ],
    )
    .await?;

    let after = ctx.tokens.usdt.balance_of(swap.address()).await?;
    assert!(after > before, "USDT balance not increased");
    Ok(())
}

/// The contract forwards its USDT to an externally owned account.
async fn transfer_usdt_to_eoa(ctx: &mut SwapScenario) -> ChainResult<()> {
    let swap = ctx.swap();
    let usdt = &ctx.tokens.usdt;
    let eoa = parse_address(common::EOA)?;

    let amount = usdt.balance_of(swap.address()).await?;
    assert_eq!(usdt.balance_of(eoa).await?, U256::ZERO);

    swap.transact(
        "transferERC20",
        &[DynSolValue::Address(usdt.address()), DynSolValue::Address(eoa), uint(amount)],
    )
    .await?;

    assert_eq!(usdt.balance_of(eoa).await?, amount, "USDT transfer failed");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a local mainnet fork, PRIVATE_KEY/ACCOUNT and solc 0.8.17"]
async fn test_swap_scenario() {
    let mut ctx = SwapScenario::setup().await.expect("scenario setup");

    deploy(&mut ctx).await.expect("deploy");
    deposit(&mut ctx).await.expect("deposit");
    wrap_eth(&mut ctx).await.expect("wrap ETH to WETH");
    swap_weth_usdc_uniswap(&mut ctx).await.expect("swap WETH→USDC on Uniswap V3");
    swap_usdc_usdt_sushiswap(&mut ctx).await.expect("swap USDC→USDT on Sushiswap");
    transfer_usdt_to_eoa(&mut ctx).await.expect("transfer USDT to EOA");
}
