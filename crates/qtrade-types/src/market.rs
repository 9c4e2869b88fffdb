//! Trading markets (MARKET_BASE format, e.g. "LTC_BTC")
//!
//! A market trades its *market currency* (left of `_`) against its *base
//! currency* (right of `_`). Order amounts are denominated in the market
//! currency and prices in the base currency.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::currency::Currency;
use crate::error::TypesError;

macro_rules! markets {
    ($($variant:ident = $id:literal => $name:literal, $market:ident / $base:ident;)+) => {
        /// Market listed on the exchange, identified on the wire by its numeric id
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum Market {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant = $id,
            )+
        }

        const ALL_MARKETS: &[Market] = &[$(Market::$variant,)+];

        impl Market {
            /// Market name as used in URLs (e.g. "LTC_BTC")
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Market::$variant => $name,)+
                }
            }

            /// Currency being bought or sold (order amounts use its precision)
            pub fn market_currency(&self) -> Currency {
                match self {
                    $(Market::$variant => Currency::$market,)+
                }
            }

            /// Currency the price is quoted in (order prices use its precision)
            pub fn base_currency(&self) -> Currency {
                match self {
                    $(Market::$variant => Currency::$base,)+
                }
            }

            /// Look up a market by numeric id
            pub fn from_id(id: u32) -> Result<Self, TypesError> {
                match id {
                    $($id => Ok(Market::$variant),)+
                    _ => Err(TypesError::UnknownMarket(id.to_string())),
                }
            }
        }

        impl FromStr for Market {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Market::$variant),)+
                    _ => Err(TypesError::UnknownMarket(s.to_string())),
                }
            }
        }
    };
}

markets! {
    LtcBtc = 1 => "LTC_BTC", Ltc / Btc;
    RcoBtc = 2 => "RCO_BTC", Rco / Btc;
    RednBtc = 3 => "REDN_BTC", Redn / Btc;
    CprBtc = 4 => "CPR_BTC", Cpr / Btc;
    BacBtc = 5 => "BAC_BTC", Bac / Btc;
    QuanBtc = 6 => "QUAN_BTC", Quan / Btc;
    RvnBtc = 7 => "RVN_BTC", Rvn / Btc;
    MmoBtc = 8 => "MMO_BTC", Mmo / Btc;
    BtmBtc = 9 => "BTM_BTC", Btm / Btc;
    AnuBtc = 10 => "ANU_BTC", Anu / Btc;
    Bws20Btc = 11 => "BWS20_BTC", Bws20 / Btc;
    Bws20Bws10 = 12 => "BWS20_BWS10", Bws20 / Bws10;
    DeftBtc = 13 => "DEFT_BTC", Deft / Btc;
    RupxBtc = 14 => "RUPX_BTC", Rupx / Btc;
    VeoBtc = 15 => "VEO_BTC", Veo / Btc;
    ThcBtc = 16 => "THC_BTC", Thc / Btc;
    SccBtc = 17 => "SCC_BTC", Scc / Btc;
    XbrBtc = 18 => "XBR_BTC", Xbr / Btc;
    SnowBtc = 19 => "SNOW_BTC", Snow / Btc;
    BisBtc = 20 => "BIS_BTC", Bis / Btc;
    PhlBtc = 21 => "PHL_BTC", Phl / Btc;
    GrinBtc = 23 => "GRIN_BTC", Grin / Btc;
    NyzoBtc = 24 => "NYZO_BTC", Nyzo / Btc;
    Tao1Btc = 25 => "TAO1_BTC", Tao1 / Btc;
    XeqBtc = 26 => "XEQ_BTC", Xeq / Btc;
    VlsBtc = 27 => "VLS_BTC", Vls / Btc;
    ZanoBtc = 28 => "ZANO_BTC", Zano / Btc;
    PascBtc = 30 => "PASC_BTC", Pasc / Btc;
    NanoBtc = 31 => "NANO_BTC", Nano / Btc;
    CruzBtc = 32 => "CRUZ_BTC", Cruz / Btc;
    BanBtc = 33 => "BAN_BTC", Ban / Btc;
    McmBtc = 34 => "MCM_BTC", Mcm / Btc;
    AroBtc = 35 => "ARO_BTC", Aro / Btc;
    DogeBtc = 36 => "DOGE_BTC", Doge / Btc;
    HlsBtc = 37 => "HLS_BTC", Hls / Btc;
    WebdBtc = 38 => "WEBD_BTC", Webd / Btc;
    ArmsBtc = 39 => "ARMS_BTC", Arms / Btc;
    CcxBtc = 40 => "CCX_BTC", Ccx / Btc;
    EthBtc = 41 => "ETH_BTC", Eth / Btc;
    PegBtc = 42 => "PEG_BTC", Peg / Btc;
    BtcPUsd = 43 => "BTC_pUSD", Btc / PUsd;
    EthPUsd = 44 => "ETH_pUSD", Eth / PUsd;
    PegPUsd = 45 => "PEG_pUSD", Peg / PUsd;
    PFctPUsd = 46 => "pFCT_pUSD", PFct / PUsd;
    FctPUsd = 47 => "FCT_pUSD", Fct / PUsd;
    FctBtc = 48 => "FCT_BTC", Fct / Btc;
    IdnaBtc = 49 => "IDNA_BTC", Idna / Btc;
    DgbBtc = 50 => "DGB_BTC", Dgb / Btc;
    KlpBtc = 51 => "KLP_BTC", Klp / Btc;
    XtoBtc = 52 => "XTO_BTC", Xto / Btc;
    LuckBtc = 53 => "LUCK_BTC", Luck / Btc;
    HtrBtc = 54 => "HTR_BTC", Htr / Btc;
    RtmBtc = 55 => "RTM_BTC", Rtm / Btc;
    BtcUsdt = 56 => "BTC_USDT", Btc / Usdt;
    EthUsdt = 57 => "ETH_USDT", Eth / Usdt;
    NyzoUsdt = 58 => "NYZO_USDT", Nyzo / Usdt;
    KlpUsdt = 59 => "KLP_USDT", Klp / Usdt;
    HtrUsdt = 60 => "HTR_USDT", Htr / Usdt;
    WfctFct = 61 => "WFCT_FCT", Wfct / Fct;
}

impl Market {
    /// All listed markets, ordered by id
    pub fn all() -> impl Iterator<Item = Market> {
        ALL_MARKETS.iter().copied()
    }

    /// Numeric market id used in request bodies (`market_id`)
    pub fn id(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for Market {
    type Error = TypesError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

// On the wire a market is its numeric id.
impl Serialize for Market {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.id())
    }
}

impl<'de> Deserialize<'de> for Market {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u32::deserialize(deserializer)?;
        Self::from_id(id).map_err(serde::de::Error::custom)
    }
}
