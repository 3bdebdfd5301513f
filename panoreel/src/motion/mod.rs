/// Seeded pan-crop ("Ken Burns") rectangle sampling and interpolation.
pub mod pan;
