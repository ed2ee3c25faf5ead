use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use prost::Message;
use tracing::{debug, span, Level};

use crate::config::PipelineConfig;
use crate::domain::{Coin, Fee, WalletAccount};
use crate::error::SigningError;
use crate::ports::NodePort;
use crate::proto::cosmos::tx::signing::v1beta1::SignMode;
use crate::proto::cosmos::tx::v1beta1::TxRaw;
use crate::proto::google::protobuf::Any;
use crate::tx::{auth_info_and_bytes, fetch_account, resolve_pub_key, signer_info, tx_body_and_bytes};

/// Multiplier applied to simulated gas when none is configured.
pub const DEFAULT_GAS_ADJUSTMENT: &str = "1.5";

/// Price of one gas unit, e.g. `0.025uchain`. Held as an exact rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: BigRational,
    pub denom: String,
    raw_amount: String,
}

impl GasPrice {
    pub fn new(amount: &str, denom: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            amount: parse_decimal(amount)?,
            denom: denom.into(),
            raw_amount: amount.trim().to_owned(),
        })
    }
}

impl FromStr for GasPrice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("gas price {s:?} has no denomination"))?;
        let (amount, denom) = s.split_at(split);
        if denom.len() < 2 || !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(format!("gas price {s:?} has an invalid denomination"));
        }
        GasPrice::new(amount, denom)
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.raw_amount, self.denom)
    }
}

/// Parses a plain decimal (`"1.5"`, `"0.025"`, `"3"`) into an exact rational.
pub fn parse_decimal(raw: &str) -> Result<BigRational, String> {
    let raw = raw.trim();
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(format!("{raw:?} is not a decimal number"));
    }
    let digits = format!("{int_part}{frac_part}");
    let numer = BigInt::from_str(&digits).map_err(|e| e.to_string())?;
    let denom = num_traits::pow(BigInt::from(10u8), frac_part.len());
    Ok(BigRational::new(numer, denom))
}

/// Positive decimal multiplier for simulated gas, e.g. `1.3`. Held as an
/// exact rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasAdjustment {
    ratio: BigRational,
    raw: String,
}

impl GasAdjustment {
    pub fn ratio(&self) -> &BigRational {
        &self.ratio
    }
}

impl Default for GasAdjustment {
    fn default() -> Self {
        Self {
            ratio: BigRational::new(BigInt::from(3u8), BigInt::from(2u8)),
            raw: DEFAULT_GAS_ADJUSTMENT.to_owned(),
        }
    }
}

impl FromStr for GasAdjustment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ratio = parse_decimal(s)?;
        if !ratio.is_positive() {
            return Err(format!("gas adjustment must be positive, got {:?}", s.trim()));
        }
        Ok(Self {
            ratio,
            raw: s.trim().to_owned(),
        })
    }
}

impl fmt::Display for GasAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone)]
pub struct GasConfig {
    pub gas_price: GasPrice,
    pub gas_adjustment: GasAdjustment,
    /// Upper bound for the adjusted gas limit.
    pub max_gas: Option<u64>,
}

impl GasConfig {
    pub fn new(gas_price: GasPrice) -> Self {
        Self {
            gas_price,
            gas_adjustment: GasAdjustment::default(),
            max_gas: None,
        }
    }
}

/// Multiply `a` with `f` and round the result up to the nearest integer.
pub fn mul_ceil(a: u64, f: &BigRational) -> BigInt {
    let a = BigRational::from_integer(BigInt::from(a));
    (a * f).ceil().to_integer()
}

/// `ceil(gas_used × adjustment)`, saturating at `u64::MAX`.
pub fn adjusted_gas_limit(gas_used: u64, adjustment: &BigRational) -> u64 {
    mul_ceil(gas_used, adjustment).to_u64().unwrap_or(u64::MAX)
}

/// `ceil(gas_limit × price)` in the price denomination.
pub fn calculate_fee(gas_limit: u64, gas_price: &GasPrice) -> Coin {
    let amount = mul_ceil(gas_limit, &gas_price.amount)
        .to_biguint()
        .unwrap_or_default();
    Coin {
        denom: gas_price.denom.clone(),
        amount,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimate {
    pub gas_used: u64,
    pub gas_limit: u64,
}

/// Derives gas limit and fee by simulating the finalized message set.
pub struct FeeEstimator<'a, N: ?Sized> {
    node: &'a N,
    config: &'a PipelineConfig,
}

impl<'a, N: NodePort + ?Sized> FeeEstimator<'a, N> {
    pub fn new(node: &'a N, config: &'a PipelineConfig) -> Self {
        Self { node, config }
    }

    pub async fn estimate_gas(
        &self,
        signer: &WalletAccount,
        messages: &[Any],
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<GasEstimate, SigningError> {
        let account = fetch_account(self.node, &signer.address).await?;
        let pub_key = resolve_pub_key(&account, signer, self.config.pub_key_type)?;

        let (_, body_bytes) = tx_body_and_bytes(messages.to_vec(), memo, timeout_height);
        let (_, auth_info_bytes) = auth_info_and_bytes(
            signer_info(pub_key, account.sequence, SignMode::Unspecified),
            &Fee {
                amount: Vec::new(),
                gas_limit: 0,
            },
        );
        let tx_bytes = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![Vec::new()],
        }
        .encode_to_vec();

        let gas_used = self
            .node
            .simulate(tx_bytes)
            .await
            .map_err(|e| SigningError::SimulationFailed(e.to_string()))?
            .ok_or_else(|| {
                SigningError::SimulationFailed("node returned no gas estimate".to_owned())
            })?;

        let _span = span!(Level::DEBUG, "estimate_gas").entered();

        let adjustment = &self.config.gas.gas_adjustment;
        let gas_limit = adjusted_gas_limit(gas_used, adjustment.ratio());
        debug!(
            gas_used,
            gas_limit,
            adjustment = %adjustment,
            "tx simulation successful"
        );

        if let Some(max_gas) = self.config.gas.max_gas {
            if gas_limit > max_gas {
                return Err(SigningError::SimulationFailed(format!(
                    "adjusted gas {gas_limit} exceeds the configured maximum {max_gas}"
                )));
            }
        }

        Ok(GasEstimate {
            gas_used,
            gas_limit,
        })
    }

    pub fn fee_for(&self, gas_limit: u64) -> Fee {
        let amount = calculate_fee(gas_limit, &self.config.gas.gas_price);
        let amount = if amount.amount.is_zero() {
            Vec::new()
        } else {
            vec![amount]
        };
        Fee { amount, gas_limit }
    }

    pub async fn estimate(
        &self,
        signer: &WalletAccount,
        messages: &[Any],
        memo: &str,
        timeout_height: Option<u64>,
    ) -> Result<Fee, SigningError> {
        let estimate = self
            .estimate_gas(signer, messages, memo, timeout_height)
            .await?;
        let fee = self.fee_for(estimate.gas_limit);
        debug!(fee = %fee, "fee estimated");
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn adjustment_is_exact_for_decimal_factors() {
        let config = GasConfig::new("0.025uchain".parse().expect("gas price"));
        assert_eq!(adjusted_gas_limit(100_000, config.gas_adjustment.ratio()), 150_000);

        let adjustment: GasAdjustment = "1.3".parse().expect("adjustment");
        assert_eq!(adjusted_gas_limit(100_000, adjustment.ratio()), 130_000);

        // 1.1 has no exact binary form; the decimal text keeps it at 11/10.
        let adjustment: GasAdjustment = "1.1".parse().expect("adjustment");
        assert_eq!(adjusted_gas_limit(1_000_000, adjustment.ratio()), 1_100_000);
        assert_eq!(adjustment.to_string(), "1.1");
    }

    #[test]
    fn adjusted_gas_rounds_up() {
        let ratio = parse_decimal("1.5").expect("ratio");
        assert_eq!(adjusted_gas_limit(3, &ratio), 5);
    }

    #[test]
    fn fee_rounds_up_in_price_denom() {
        let price: GasPrice = "0.025uchain".parse().expect("gas price");
        let fee = calculate_fee(150_000, &price);
        assert_eq!(fee.denom, "uchain");
        assert_eq!(fee.amount, BigUint::from(3750u32));

        let fee = calculate_fee(150_001, &price);
        assert_eq!(fee.amount, BigUint::from(3751u32));
    }

    #[test]
    fn gas_price_parsing() {
        let price: GasPrice = "0.0025ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
            .parse()
            .expect("ibc denom");
        assert!(price.denom.starts_with("ibc/"));
        assert!("0.025".parse::<GasPrice>().is_err());
        assert!("abc".parse::<GasPrice>().is_err());
        assert_eq!(
            "0.025uchain".parse::<GasPrice>().expect("gas price").to_string(),
            "0.025uchain"
        );
    }

    #[test]
    fn non_positive_adjustment_is_rejected() {
        assert!("0".parse::<GasAdjustment>().is_err());
        assert!("0.0".parse::<GasAdjustment>().is_err());
        assert!("-1".parse::<GasAdjustment>().is_err());
        assert!("NaN".parse::<GasAdjustment>().is_err());
        assert_eq!(GasAdjustment::default(), "1.5".parse().expect("adjustment"));
    }
}
