//! Hotel entities and their column encodings

use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rusqlite::{
    ToSql,
    types::{
        FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef
    },
};

/// Digits kept after the decimal point of a nightly price
pub const PRICE_SCALE: u32 = 2;

/// Digits a stored price may use in total
pub const PRICE_PRECISION: u32 = 8;

/// Amenity a hotel can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    Spa,
    Sauna,
    DogFriendly,
    IndoorPool,
    OutdoorPool,
    BikeRental,
    ECarChargingStation,
    VegetarianCuisine,
    OrganicFood,
}

impl Special {
    pub const ALL: [Special; 9] = [
        Special::Spa,
        Special::Sauna,
        Special::DogFriendly,
        Special::IndoorPool,
        Special::OutdoorPool,
        Special::BikeRental,
        Special::ECarChargingStation,
        Special::VegetarianCuisine,
        Special::OrganicFood,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Special::Spa => "Spa",
            Special::Sauna => "Sauna",
            Special::DogFriendly => "DogFriendly",
            Special::IndoorPool => "IndoorPool",
            Special::OutdoorPool => "OutdoorPool",
            Special::BikeRental => "BikeRental",
            Special::ECarChargingStation => "ECarChargingStation",
            Special::VegetarianCuisine => "VegetarianCuisine",
            Special::OrganicFood => "OrganicFood",
        }
    }

    /// Position in declaration order, which is what gets stored.
    pub fn ordinal(&self) -> i64 {
        *self as i64
    }

    pub fn from_ordinal(n: i64) -> Option<Self> {
        usize::try_from(n).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromSql for Special {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).and_then(|n| {
            Special::from_ordinal(n).ok_or(FromSqlError::OutOfRange(n))
        })
    }
}

impl ToSql for Special {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.ordinal()))
    }
}

/// Calendar date stored as `YYYY-MM-DD` text
#[derive(Clone, Copy, Debug)]
pub struct DbDate(pub NaiveDate);

impl FromSql for DbDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).and_then(|as_string| {
            NaiveDate::parse_from_str(as_string.as_str(), "%Y-%m-%d")
                .map(DbDate)
                .map_err(FromSqlError::other)
        })
    }
}

impl ToSql for DbDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let date: String = self.0.format("%Y-%m-%d").to_string();
        Ok(ToSqlOutput::from(date))
    }
}

/// Fixed-point price stored as decimal text with two fractional digits.
///
/// Binding rounds half away from zero to [`PRICE_SCALE`] places and
/// rejects anything that no longer fits in [`PRICE_PRECISION`] digits.
#[derive(Clone, Copy, Debug)]
pub struct DbDecimal(pub Decimal);

impl FromSql for DbDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).and_then(|as_string| {
            Decimal::from_str(as_string.as_str())
                .map(DbDecimal)
                .map_err(FromSqlError::other)
        })
    }
}

impl ToSql for DbDecimal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let mut price = self.0.round_dp_with_strategy(
            PRICE_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        );
        let limit = Decimal::from(10_i64.pow(PRICE_PRECISION - PRICE_SCALE));

        if price.abs() >= limit {
            return Err(rusqlite::Error::ToSqlConversionFailure(
                format!(
                    "price {} exceeds decimal({}, {})",
                    self.0, PRICE_PRECISION, PRICE_SCALE
                )
                .into(),
            ));
        }

        price.rescale(PRICE_SCALE);
        Ok(ToSqlOutput::from(price.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotelSpecial {
    pub id: i64,
    pub special: Special,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomType {
    pub id: i64,
    pub hotel_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Square meters
    pub size: i32,
    pub disability_accessible: bool,
    pub rooms_available: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPrice {
    pub id: i64,
    pub room_type_id: i64,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub price_eur_per_night: Decimal,
}

/// A price row with its room type loaded alongside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedRoom {
    pub room_type: RoomType,
    pub price: RoomPrice,
}

/// Hotel row that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewHotel {
    pub name: String,
    pub address: String,
}

/// Room type row that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewRoomType {
    pub hotel_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub size: i32,
    pub disability_accessible: bool,
    pub rooms_available: i32,
}

/// Price row that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewRoomPrice {
    pub room_type_id: i64,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub price_eur_per_night: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_ordinals_follow_declaration_order() {
        assert_eq!(Special::Spa.ordinal(), 0);
        assert_eq!(Special::OrganicFood.ordinal(), 8);
        for special in Special::ALL {
            assert_eq!(Special::from_ordinal(special.ordinal()), Some(special));
        }
        assert_eq!(Special::from_ordinal(9), None);
        assert_eq!(Special::from_ordinal(-1), None);
    }

    #[test]
    fn special_displays_its_name() {
        assert_eq!(Special::ECarChargingStation.to_string(), "ECarChargingStation");
        assert_eq!(format!("{:<8}|", Special::Spa), "Spa     |");
    }

    #[test]
    fn price_is_bound_with_two_decimals() {
        let value = DbDecimal(Decimal::new(40, 0));
        let out = value.to_sql().unwrap();
        assert_eq!(out, ToSqlOutput::from("40.00".to_string()));

        let value = DbDecimal(Decimal::new(12345, 3));
        let out = value.to_sql().unwrap();
        assert_eq!(out, ToSqlOutput::from("12.35".to_string()));
    }

    #[test]
    fn price_beyond_precision_is_rejected() {
        assert!(DbDecimal(Decimal::new(99_999_999, 2)).to_sql().is_ok());
        assert!(DbDecimal(Decimal::new(1_000_000, 0)).to_sql().is_err());
        // rounds up past the limit
        assert!(DbDecimal(Decimal::new(999_999_995, 3)).to_sql().is_err());
    }
}
