//! Currencies listed on qTrade and their default decimal precision

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

macro_rules! currencies {
    ($($variant:ident => $code:literal, $places:literal;)+) => {
        /// Currency supported by the exchange
        ///
        /// String codes are case-sensitive (`pUSD`, `pFCT`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Currency {
            $(
                #[doc = concat!("`", $code, "`")]
                $variant,
            )+
        }

        /// (currency, wire code, default decimal places), in declaration order
        const CURRENCY_TABLE: &[(Currency, &str, u32)] = &[
            $((Currency::$variant, $code, $places),)+
        ];
    };
}

currencies! {
    Usdt => "USDT", 6;
    Ban => "BAN", 29;
    Btm => "BTM", 8;
    Doge => "DOGE", 8;
    Mcm => "MCM", 9;
    Webd => "WEBD", 4;
    Quan => "QUAN", 8;
    Peg => "PEG", 8;
    Rvn => "RVN", 8;
    Bac => "BAC", 8;
    Ccx => "CCX", 6;
    Xeq => "XEQ", 4;
    Rupx => "RUPX", 8;
    Phl => "PHL", 8;
    Fct => "FCT", 8;
    Dgb => "DGB", 8;
    Xbr => "XBR", 8;
    Eth => "ETH", 18;
    Btc => "BTC", 8;
    Scc => "SCC", 8;
    PUsd => "pUSD", 8;
    Redn => "REDN", 8;
    Snow => "SNOW", 6;
    Htr => "HTR", 2;
    Cpr => "CPR", 8;
    Cruz => "CRUZ", 8;
    Veo => "VEO", 8;
    Klp => "KLP", 12;
    Vls => "VLS", 8;
    Nano => "NANO", 30;
    Deft => "DEFT", 8;
    Ltc => "LTC", 8;
    Rco => "RCO", 8;
    Tao1 => "TAO1", 8;
    Luck => "LUCK", 18;
    Wfct => "WFCT", 8;
    Mmo => "MMO", 8;
    Nyzo => "NYZO", 6;
    Bws20 => "BWS20", 8;
    Bws10 => "BWS10", 8;
    Thc => "THC", 8;
    Xto => "XTO", 18;
    Grin => "GRIN", 9;
    Pasc => "PASC", 4;
    Arms => "ARMS", 8;
    Rtm => "RTM", 8;
    Zano => "ZANO", 12;
    Anu => "ANU", 8;
    Xcp => "XCP", 8;
    Aro => "ARO", 8;
    Bis => "BIS", 8;
    Idna => "IDNA", 18;
    Hls => "HLS", 18;
    PFct => "pFCT", 8;
}

impl Currency {
    /// All supported currencies
    pub fn all() -> impl Iterator<Item = Currency> {
        CURRENCY_TABLE.iter().map(|(currency, _, _)| *currency)
    }

    /// Wire code as used in URLs and JSON bodies
    pub fn as_str(&self) -> &'static str {
        CURRENCY_TABLE[*self as usize].1
    }

    /// Decimal places the exchange accepts for amounts of this currency
    pub fn default_precision(&self) -> u32 {
        CURRENCY_TABLE[*self as usize].2
    }
}

impl FromStr for Currency {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CURRENCY_TABLE
            .iter()
            .find(|(_, code, _)| *code == s)
            .map(|(currency, _, _)| *currency)
            .ok_or_else(|| TypesError::unsupported_currency(s))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Operational status of a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyStatus {
    Ok,
    Degraded,
    Disabled,
    Offline,
    Delisted,
    /// Status string not known to this client
    #[serde(other)]
    Unknown,
}

impl CurrencyStatus {
    /// Returns true if deposits and withdrawals are expected to work
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Ok | Self::Degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes_round_trip() {
        for currency in Currency::all() {
            let parsed: Currency = currency.as_str().parse().unwrap();
            assert_eq!(parsed, currency);
        }
        assert_eq!(Currency::all().count(), 54);
    }

    #[test]
    fn test_currency_codes_are_case_sensitive() {
        assert_eq!("pUSD".parse::<Currency>().unwrap(), Currency::PUsd);
        assert!("PUSD".parse::<Currency>().is_err());
        assert!("btc".parse::<Currency>().is_err());
    }

    #[test]
    fn test_default_precision() {
        assert_eq!(Currency::Btc.default_precision(), 8);
        assert_eq!(Currency::Eth.default_precision(), 18);
        assert_eq!(Currency::Nano.default_precision(), 30);
        assert_eq!(Currency::Htr.default_precision(), 2);
        assert_eq!(Currency::Usdt.default_precision(), 6);
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&Currency::PFct).unwrap(), "\"pFCT\"");

        let parsed: Currency = serde_json::from_str("\"DOGE\"").unwrap();
        assert_eq!(parsed, Currency::Doge);

        assert!(serde_json::from_str::<Currency>("\"NOPE\"").is_err());
    }

    #[test]
    fn test_currency_status_serde() {
        let status: CurrencyStatus = serde_json::from_str("\"degraded\"").unwrap();
        assert_eq!(status, CurrencyStatus::Degraded);
        assert!(status.is_operational());

        let status: CurrencyStatus = serde_json::from_str("\"frozen\"").unwrap();
        assert_eq!(status, CurrencyStatus::Unknown);
    }
}
