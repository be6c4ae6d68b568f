//! Markdown report of every stored hotel

use std::io::Write;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::HotelContext;
use crate::error::Result;
use crate::model::{Hotel, PricedRoom, PRICE_SCALE};

const DATE_FMT: &str = "%Y-%m-%d";

/// Write one Markdown section per hotel, in id order.
pub fn write_report<W: Write>(ctx: &HotelContext, out: &mut W) -> Result<()> {
    for hotel in ctx.hotels()? {
        write_hotel(ctx, &hotel, out)?;
    }

    out.flush()?;
    Ok(())
}

fn write_hotel<W: Write>(ctx: &HotelContext, hotel: &Hotel, out: &mut W) -> Result<()> {
    writeln!(out, "# {}", hotel.name)?;
    writeln!(out)?;
    writeln!(out, "## Location")?;
    writeln!(out)?;
    writeln!(out, "{}", hotel.address)?;
    writeln!(out)?;

    writeln!(out, "## Specials")?;
    writeln!(out)?;
    for special in ctx.specials_for_hotel(hotel.id)? {
        writeln!(out, "* {}", special.special)?;
    }
    writeln!(out)?;

    writeln!(out, "## Room Types")?;
    writeln!(out)?;
    writeln!(out, "{}", table_header())?;
    writeln!(out, "{}", table_separator())?;
    for priced in ctx.prices_for_hotel(hotel.id)? {
        writeln!(out, "{}", table_row(&priced))?;
    }
    writeln!(out)?;

    Ok(())
}

pub fn table_header() -> String {
    format!(
        "| {:<20} | {:>6} | {:<16} | {:<14} | {:>10} |",
        "Room Type", "Size", "Price Valid From", "Price Valid To", "Price in €"
    )
}

pub fn table_separator() -> String {
    format!(
        "| {} | {}: | {} | {} | {}: |",
        "-".repeat(20),
        "-".repeat(5),
        "-".repeat(16),
        "-".repeat(14),
        "-".repeat(9)
    )
}

pub fn table_row(priced: &PricedRoom) -> String {
    format!(
        "| {:<20} | {:>6} | {:<16} | {:<14} | {:>10} |",
        priced.room_type.title,
        format!("{} m²", priced.room_type.size),
        format_date(priced.price.valid_from),
        format_date(priced.price.valid_until),
        format_price(priced.price.price_eur_per_night),
    )
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FMT).to_string()).unwrap_or_default()
}

/// Whole prices drop their cents (`40 €`), anything else keeps both
/// decimal places (`65.50 €`).
pub fn format_price(price: Decimal) -> String {
    if price.fract().is_zero() {
        return format!("{} €", price.trunc().normalize());
    }

    let mut cents = price.round_dp(PRICE_SCALE);
    cents.rescale(PRICE_SCALE);
    format!("{} €", cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RoomPrice, RoomType};

    fn priced(title: &str, size: i32, price: Decimal) -> PricedRoom {
        PricedRoom {
            room_type: RoomType {
                id: 1,
                hotel_id: 1,
                title: title.to_string(),
                description: None,
                size,
                disability_accessible: false,
                rooms_available: 1,
            },
            price: RoomPrice {
                id: 1,
                room_type_id: 1,
                valid_from: None,
                valid_until: None,
                price_eur_per_night: price,
            },
        }
    }

    #[test]
    fn header_and_separator_line_up() {
        assert_eq!(
            table_header(),
            "| Room Type            |   Size | Price Valid From | Price Valid To | Price in € |"
        );
        assert_eq!(
            table_separator(),
            "| -------------------- | -----: | ---------------- | -------------- | ---------: |"
        );
    }

    #[test]
    fn size_and_price_are_right_aligned() {
        let row = table_row(&priced("Honeymoon suite", 100, Decimal::new(30000, 2)));
        assert_eq!(
            row,
            "| Honeymoon suite      | 100 m² |                  |                |      300 € |"
        );

        let row = table_row(&priced("Single room", 10, Decimal::from(40)));
        assert!(row.contains("|  10 m² |"));
        assert!(row.contains("|       40 € |"));
    }

    #[test]
    fn validity_window_is_printed_as_iso_dates() {
        let mut room = priced("Double room", 15, Decimal::new(6550, 2));
        room.price.valid_from = NaiveDate::from_ymd_opt(2024, 6, 1);
        room.price.valid_until = NaiveDate::from_ymd_opt(2024, 8, 31);

        assert_eq!(
            table_row(&room),
            "| Double room          |  15 m² | 2024-06-01       | 2024-08-31     |    65.50 € |"
        );
    }

    #[test]
    fn prices_keep_their_cents() {
        assert_eq!(format_price(Decimal::new(4000, 2)), "40 €");
        assert_eq!(format_price(Decimal::new(4099, 2)), "40.99 €");
        assert_eq!(format_price(Decimal::new(4050, 2)), "40.50 €");
        assert_eq!(format_price(Decimal::new(405, 1)), "40.50 €");
        assert_eq!(format_price(Decimal::new(30000, 2)), "300 €");
    }
}
