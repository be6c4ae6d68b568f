use std::fmt;
use rusqlite::{named_params, Connection, Row, Transaction};

use crate::db::{config::Config, conn::create_conn};
use crate::error::Result;
use crate::model::{
    DbDate, DbDecimal, Hotel, HotelSpecial, NewHotel, NewRoomPrice,
    NewRoomType, PricedRoom, RoomPrice, RoomType, Special,
};

/// Tables of the hotel schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    HotelHotelSpecial,
    Hotels,
    HotelSpecials,
    RoomPrices,
    RoomTypes,
}

impl Table {
    /// Delete order that never leaves a dangling reference behind.
    pub const DROP_ORDER: [Table; 5] = [
        Table::HotelHotelSpecial,
        Table::Hotels,
        Table::HotelSpecials,
        Table::RoomPrices,
        Table::RoomTypes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::HotelHotelSpecial => "HotelHotelSpecial",
            Table::Hotels => "Hotels",
            Table::HotelSpecials => "HotelSpecials",
            Table::RoomPrices => "RoomPrices",
            Table::RoomTypes => "RoomTypes",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the database connection and gives typed access to every
/// entity collection.
pub struct HotelContext {
    conn: Connection,
}

impl HotelContext {
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self { conn: create_conn(config)? })
    }

    /// Fresh in-memory store with the full schema. Useful for testing.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&Config::new(":memory:"))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Start staging inserts. Nothing is visible to other connections
    /// until [`SeedBatch::save_changes`] commits.
    pub fn begin(&mut self) -> Result<SeedBatch<'_>> {
        Ok(SeedBatch { tx: self.conn.transaction()?, staged: 0 })
    }

    pub fn hotels(&self) -> Result<Vec<Hotel>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, Name, Address FROM Hotels ORDER BY Id",
        )?;
        let rows = stmt.query_map([], hotel_from_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<Hotel>>>()?)
    }

    pub fn hotel_specials(&self) -> Result<Vec<HotelSpecial>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, Special FROM HotelSpecials ORDER BY Id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HotelSpecial {
                id: row.get(0)?,
                special: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<HotelSpecial>>>()?)
    }

    pub fn room_types(&self) -> Result<Vec<RoomType>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, HotelId, Title, Description, Size,
                DisabilityAccessible, RoomsAvailable
            FROM RoomTypes ORDER BY Id",
        )?;
        let rows = stmt.query_map([], |row| room_type_from_row(row, 0))?;

        Ok(rows.collect::<rusqlite::Result<Vec<RoomType>>>()?)
    }

    pub fn room_prices(&self) -> Result<Vec<RoomPrice>> {
        let mut stmt = self.conn.prepare(
            "SELECT Id, RoomTypeId, ValidFrom, ValidUntil, PriceEurPerNight
            FROM RoomPrices ORDER BY Id",
        )?;
        let rows = stmt.query_map([], |row| room_price_from_row(row, 0))?;

        Ok(rows.collect::<rusqlite::Result<Vec<RoomPrice>>>()?)
    }

    /// Specials of one hotel, in the order they were linked.
    pub fn specials_for_hotel(&self, hotel_id: i64) -> Result<Vec<HotelSpecial>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.Id, s.Special
            FROM HotelHotelSpecial hs
            JOIN HotelSpecials s ON s.Id = hs.SpecialsId
            WHERE hs.HotelsId = @hotel_id
            ORDER BY hs.rowid",
        )?;
        let rows = stmt.query_map(named_params! { "@hotel_id": hotel_id }, |row| {
            Ok(HotelSpecial {
                id: row.get(0)?,
                special: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<HotelSpecial>>>()?)
    }

    /// Every price of the hotel's room types, each with its room type.
    pub fn prices_for_hotel(&self, hotel_id: i64) -> Result<Vec<PricedRoom>> {
        let mut stmt = self.conn.prepare(
            "SELECT rp.Id, rp.RoomTypeId, rp.ValidFrom, rp.ValidUntil,
                rp.PriceEurPerNight,
                rt.Id, rt.HotelId, rt.Title, rt.Description, rt.Size,
                rt.DisabilityAccessible, rt.RoomsAvailable
            FROM RoomPrices rp
            JOIN RoomTypes rt ON rt.Id = rp.RoomTypeId
            WHERE rt.HotelId = @hotel_id
            ORDER BY rp.Id",
        )?;
        let rows = stmt.query_map(named_params! { "@hotel_id": hotel_id }, |row| {
            Ok(PricedRoom {
                price: room_price_from_row(row, 0)?,
                room_type: room_type_from_row(row, 5)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<PricedRoom>>>()?)
    }

    pub fn count(&self, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;

        Ok(count as usize)
    }

    /// Unconditionally delete every row of `table`.
    pub fn execute_raw_delete(&self, table: Table) -> Result<usize> {
        delete_all(&self.conn, table)
    }

    /// Empty all tables inside a single transaction.
    pub fn drop_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        for table in Table::DROP_ORDER {
            delete_all(&tx, table)?;
        }

        tx.commit()?;
        Ok(())
    }
}

/// Inserts staged inside one transaction. Dropping the batch without
/// calling [`SeedBatch::save_changes`] rolls every staged row back.
pub struct SeedBatch<'conn> {
    tx: Transaction<'conn>,
    staged: usize,
}

impl SeedBatch<'_> {
    /// Returns the generated ids, in input order.
    pub fn add_specials(&mut self, specials: &[Special]) -> Result<Vec<i64>> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO HotelSpecials (Special) VALUES (@special)",
        )?;

        let mut ids = Vec::with_capacity(specials.len());
        for special in specials {
            stmt.execute(named_params! { "@special": special })?;
            ids.push(self.tx.last_insert_rowid());
        }

        log::debug!("Staged {} hotel specials", ids.len());
        self.staged += ids.len();
        Ok(ids)
    }

    pub fn add_hotels(&mut self, hotels: &[NewHotel]) -> Result<Vec<i64>> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO Hotels (Name, Address) VALUES (@name, @address)",
        )?;

        let mut ids = Vec::with_capacity(hotels.len());
        for hotel in hotels {
            stmt.execute(named_params! {
                "@name": hotel.name,
                "@address": hotel.address,
            })?;
            ids.push(self.tx.last_insert_rowid());
        }

        log::debug!("Staged {} hotels", ids.len());
        self.staged += ids.len();
        Ok(ids)
    }

    /// Link a hotel to specials that were already staged or stored.
    pub fn link_specials(&mut self, hotel_id: i64, special_ids: &[i64]) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO HotelHotelSpecial (HotelsId, SpecialsId)
                VALUES (@hotel_id, @special_id)",
        )?;

        for special_id in special_ids {
            stmt.execute(named_params! {
                "@hotel_id": hotel_id,
                "@special_id": special_id,
            })?;
        }

        self.staged += special_ids.len();
        Ok(())
    }

    pub fn add_room_types(&mut self, room_types: &[NewRoomType]) -> Result<Vec<i64>> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO RoomTypes (HotelId, Title, Description, Size,
                DisabilityAccessible, RoomsAvailable)
            VALUES (@hotel_id, @title, @description, @size,
                @accessible, @rooms)",
        )?;

        let mut ids = Vec::with_capacity(room_types.len());
        for room_type in room_types {
            stmt.execute(named_params! {
                "@hotel_id": room_type.hotel_id,
                "@title": room_type.title,
                "@description": room_type.description,
                "@size": room_type.size,
                "@accessible": room_type.disability_accessible,
                "@rooms": room_type.rooms_available,
            })?;
            ids.push(self.tx.last_insert_rowid());
        }

        log::debug!("Staged {} room types", ids.len());
        self.staged += ids.len();
        Ok(ids)
    }

    pub fn add_room_prices(&mut self, prices: &[NewRoomPrice]) -> Result<Vec<i64>> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO RoomPrices (RoomTypeId, ValidFrom, ValidUntil,
                PriceEurPerNight)
            VALUES (@room_type_id, @valid_from, @valid_until, @price)",
        )?;

        let mut ids = Vec::with_capacity(prices.len());
        for price in prices {
            stmt.execute(named_params! {
                "@room_type_id": price.room_type_id,
                "@valid_from": price.valid_from.map(DbDate),
                "@valid_until": price.valid_until.map(DbDate),
                "@price": DbDecimal(price.price_eur_per_night),
            })?;
            ids.push(self.tx.last_insert_rowid());
        }

        log::debug!("Staged {} room prices", ids.len());
        self.staged += ids.len();
        Ok(ids)
    }

    /// Commit everything staged so far as one batch. Returns the number
    /// of rows written.
    pub fn save_changes(self) -> Result<usize> {
        let staged = self.staged;
        self.tx.commit()?;

        log::info!("Committed {} rows", staged);
        Ok(staged)
    }
}

fn delete_all(conn: &Connection, table: Table) -> Result<usize> {
    let deleted = conn.execute(&format!("DELETE FROM {}", table.name()), [])?;
    log::info!("Deleted {} rows from {}", deleted, table);

    Ok(deleted)
}

fn hotel_from_row(row: &Row<'_>) -> rusqlite::Result<Hotel> {
    Ok(Hotel {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn room_type_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<RoomType> {
    Ok(RoomType {
        id: row.get(offset)?,
        hotel_id: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        size: row.get(offset + 4)?,
        disability_accessible: row.get(offset + 5)?,
        rooms_available: row.get(offset + 6)?,
    })
}

fn room_price_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<RoomPrice> {
    let valid_from: Option<DbDate> = row.get(offset + 2)?;
    let valid_until: Option<DbDate> = row.get(offset + 3)?;
    let price: DbDecimal = row.get(offset + 4)?;

    Ok(RoomPrice {
        id: row.get(offset)?,
        room_type_id: row.get(offset + 1)?,
        valid_from: valid_from.map(|d| d.0),
        valid_until: valid_until.map(|d| d.0),
        price_eur_per_night: price.0,
    })
}
