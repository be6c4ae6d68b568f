use rusqlite::Connection;

use crate::error::Result;

/// Create all tables and indexes if they don't exist.
pub fn create_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS Hotels (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT NOT NULL CHECK (length(Name) <= 50),
            Address TEXT NOT NULL CHECK (length(Address) <= 50)
        );

        CREATE TABLE IF NOT EXISTS HotelSpecials (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Special INTEGER NOT NULL CHECK (Special BETWEEN 0 AND 8)
        );

        CREATE TABLE IF NOT EXISTS HotelHotelSpecial (
            HotelsId INTEGER NOT NULL
                REFERENCES Hotels (Id) ON DELETE CASCADE,
            SpecialsId INTEGER NOT NULL
                REFERENCES HotelSpecials (Id) ON DELETE CASCADE,
            PRIMARY KEY (HotelsId, SpecialsId)
        );

        CREATE TABLE IF NOT EXISTS RoomTypes (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            HotelId INTEGER NOT NULL
                REFERENCES Hotels (Id) ON DELETE CASCADE,
            Title TEXT NOT NULL CHECK (length(Title) <= 50),
            Description TEXT CHECK (length(Description) <= 100),
            Size INTEGER NOT NULL,
            DisabilityAccessible INTEGER NOT NULL DEFAULT 0,
            RoomsAvailable INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS RoomPrices (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            RoomTypeId INTEGER NOT NULL
                REFERENCES RoomTypes (Id) ON DELETE CASCADE,
            ValidFrom TEXT,
            ValidUntil TEXT,
            PriceEurPerNight TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS IX_Hotels_Id ON Hotels (Id);
        CREATE UNIQUE INDEX IF NOT EXISTS IX_HotelSpecials_Id ON HotelSpecials (Id);
        CREATE UNIQUE INDEX IF NOT EXISTS IX_RoomTypes_Id ON RoomTypes (Id);
        CREATE UNIQUE INDEX IF NOT EXISTS IX_RoomPrices_Id ON RoomPrices (Id);

        CREATE INDEX IF NOT EXISTS IX_HotelHotelSpecial_SpecialsId
            ON HotelHotelSpecial (SpecialsId);
        CREATE INDEX IF NOT EXISTS IX_RoomTypes_HotelId
            ON RoomTypes (HotelId);
        CREATE INDEX IF NOT EXISTS IX_RoomPrices_RoomTypeId
            ON RoomPrices (RoomTypeId);

        COMMIT;",
    )?;

    Ok(())
}
