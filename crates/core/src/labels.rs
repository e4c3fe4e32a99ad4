//! Categorical fields of a booking, carried as their literal dataset labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:tt) { $($variant:ident => $label:tt),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label as it appears in the training data.
            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownLabel {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    HotelType("hotel") {
        City => "City Hotel",
        Resort => "Resort Hotel",
    }
}

labelled_enum! {
    MealPlan("meal") {
        BedAndBreakfast => "BB",
        SelfCatering => "SC",
        HalfBoard => "HB",
        Undefined => "Undefined",
        FullBoard => "FB",
    }
}

labelled_enum! {
    MarketSegment("market_segment") {
        OnlineTa => "Online TA",
        OfflineTaTo => "Offline TA/TO",
        Direct => "Direct",
        Groups => "Groups",
        Corporate => "Corporate",
        Complementary => "Complementary",
        Aviation => "Aviation",
        Undefined => "Undefined",
    }
}

labelled_enum! {
    DistributionChannel("distribution_channel") {
        TaTo => "TA/TO",
        Direct => "Direct",
        Corporate => "Corporate",
        Gds => "GDS",
        Undefined => "Undefined",
    }
}

labelled_enum! {
    DepositType("deposit_type") {
        NoDeposit => "No Deposit",
        NonRefund => "Non Refund",
        Refundable => "Refundable",
    }
}

labelled_enum! {
    CustomerType("customer_type") {
        Transient => "Transient",
        TransientParty => "Transient-Party",
        Contract => "Contract",
        Group => "Group",
    }
}

labelled_enum! {
    /// Room categories. Reserved rooms never use `I` or `K`.
    RoomType("room_type") {
        A => "A",
        B => "B",
        C => "C",
        D => "D",
        E => "E",
        F => "F",
        G => "G",
        H => "H",
        I => "I",
        K => "K",
        L => "L",
    }
}

labelled_enum! {
    Weekday("arrival_day_of_week") {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

impl RoomType {
    pub fn reservable(self) -> bool {
        !matches!(self, RoomType::I | RoomType::K)
    }
}

impl Weekday {
    /// 1-based position in the week, Monday = 1.
    pub fn ordinal(self) -> u8 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
            Weekday::Sunday => 7,
        }
    }
}
