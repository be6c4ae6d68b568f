//! Demonstration dataset for the `add` command

use std::collections::HashMap;
use rust_decimal::Decimal;

use crate::db::HotelContext;
use crate::error::Result;
use crate::model::{NewHotel, NewRoomPrice, NewRoomType, Special};

pub struct SeedRoomType {
    pub title: &'static str,
    pub size: i32,
    pub rooms_available: i32,
    pub disability_accessible: bool,
    pub price_eur_per_night: i64,
}

pub struct SeedHotel {
    pub name: &'static str,
    pub address: &'static str,
    pub specials: &'static [Special],
    pub room_types: &'static [SeedRoomType],
}

pub const SEED_HOTELS: [SeedHotel; 2] = [
    SeedHotel {
        name: "Pension Marianne",
        address: "Am Hausberg 17, 1234 Irgendwo",
        specials: &[Special::DogFriendly, Special::OrganicFood],
        room_types: &[
            SeedRoomType {
                title: "Single room",
                size: 10,
                rooms_available: 3,
                disability_accessible: false,
                price_eur_per_night: 40,
            },
            SeedRoomType {
                title: "Double room",
                size: 15,
                rooms_available: 10,
                disability_accessible: false,
                price_eur_per_night: 60,
            },
        ],
    },
    SeedHotel {
        name: "Grand Hotel Goldener Hirsch",
        address: "Im stillen Tal 42, 4711 Schönberg",
        specials: &[
            Special::Spa,
            Special::Sauna,
            Special::IndoorPool,
            Special::OutdoorPool,
        ],
        room_types: &[
            SeedRoomType {
                title: "Single room",
                size: 15,
                rooms_available: 10,
                disability_accessible: true,
                price_eur_per_night: 70,
            },
            SeedRoomType {
                title: "Double room",
                size: 30,
                rooms_available: 25,
                disability_accessible: true,
                price_eur_per_night: 120,
            },
            SeedRoomType {
                title: "Junior suite",
                size: 45,
                rooms_available: 5,
                disability_accessible: true,
                price_eur_per_night: 190,
            },
            SeedRoomType {
                title: "Honeymoon suite",
                size: 100,
                rooms_available: 1,
                disability_accessible: true,
                price_eur_per_night: 300,
            },
        ],
    },
];

/// Insert the fixed dataset as one batch.
pub fn add_data(ctx: &mut HotelContext) -> Result<usize> {
    seed(ctx, &SEED_HOTELS)
}

/// Every special the hotels offer, once, in order of first use.
pub fn distinct_specials(hotels: &[SeedHotel]) -> Vec<Special> {
    let mut specials: Vec<Special> = Vec::new();

    for special in hotels.iter().flat_map(|h| h.specials) {
        if !specials.contains(special) {
            specials.push(*special);
        }
    }

    specials
}

/// Insert each distinct special once, then every hotel with its links,
/// room types and prices. Parents go in first so children can reference
/// the ids they were given; the whole batch commits or none of it does.
pub fn seed(ctx: &mut HotelContext, hotels: &[SeedHotel]) -> Result<usize> {
    let specials = distinct_specials(hotels);
    let mut batch = ctx.begin()?;

    let special_ids: HashMap<Special, i64> = specials
        .iter()
        .copied()
        .zip(batch.add_specials(&specials)?)
        .collect();

    let new_hotels: Vec<NewHotel> = hotels
        .iter()
        .map(|h| NewHotel {
            name: h.name.to_string(),
            address: h.address.to_string(),
        })
        .collect();
    let hotel_ids = batch.add_hotels(&new_hotels)?;

    for (hotel, &hotel_id) in hotels.iter().zip(&hotel_ids) {
        let linked: Vec<i64> = hotel
            .specials
            .iter()
            .map(|s| special_ids[s])
            .collect();
        batch.link_specials(hotel_id, &linked)?;

        let room_types: Vec<NewRoomType> = hotel
            .room_types
            .iter()
            .map(|rt| NewRoomType {
                hotel_id,
                title: rt.title.to_string(),
                description: None,
                size: rt.size,
                disability_accessible: rt.disability_accessible,
                rooms_available: rt.rooms_available,
            })
            .collect();
        let room_type_ids = batch.add_room_types(&room_types)?;

        let prices: Vec<NewRoomPrice> = hotel
            .room_types
            .iter()
            .zip(room_type_ids)
            .map(|(rt, room_type_id)| NewRoomPrice {
                room_type_id,
                valid_from: None,
                valid_until: None,
                price_eur_per_night: Decimal::from(rt.price_eur_per_night),
            })
            .collect();
        batch.add_room_prices(&prices)?;
    }

    batch.save_changes()
}
