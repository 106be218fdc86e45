//! Integration tests for the processor module
//!
//! Runs the complete pipeline against small results exports written to a
//! temporary directory.


use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str =
    "Sporcu,Takim,Yaris_Adi,Yaris_Adi2,Seri_Adi,Yaris_Yeri,Tarih,Parkur_No,Seri_No,Sonuc,Derece,ihtar,Seri_Saat";

/// Seven rows: five usable, one repeated header, one without an athlete
pub const SAMPLE_ROWS: &[&str] = &[
    "Ali Veli,Galatasaray,Türkiye Şampiyonası,Finaller,Genç Erkek 1x,Haliç,15 Mayıs 2023,3,1,1,\"7.01,10\",0,0.375",
    "Ayşe Kaya,Haliç Kürek,Türkiye Şampiyonası,Finaller,Genç Kadın 1x,Haliç,15 Mayıs 2023,2,2,2,7.45.00,,0.4375",
    "Sporcu,Takim,Yaris_Adi,Yaris_Adi2,Seri_Adi,Yaris_Yeri,Tarih,Parkur_No,Seri_No,Sonuc,Derece,ihtar,Seri_Saat",
    "Ali Veli,Galatasaray,Bahar Kupası,,Genç Erkek 1x,Sapanca,02.06.2023,4,1,3,DNF,1,09:30",
    "Can Demir,Haliç Kürek,Bahar Kupası,,Genç Erkek 2x,Sapanca,02.06.2023,2,2,1,41.97,nan,09:30",
    ",Haliç Kürek,Bahar Kupası,,Genç Erkek 2x,Sapanca,02.06.2023,5,2,2,7.00.00,,",
    "Deniz Ak,Ankara Spor,Bahar Kupası,,Genç Erkek 2x,Sapanca,02.06.2023,1,2,0,çizgi,,",
];

/// Write an export with the standard header and the given rows
pub fn write_export(temp_dir: &TempDir, rows: &[&str]) -> PathBuf {
    write_csv(temp_dir, HEADER, rows)
}

/// Write an export with a custom header line
pub fn write_csv(temp_dir: &TempDir, header: &str, rows: &[&str]) -> PathBuf {
    let path = temp_dir.path().join("results.csv");
    let mut content = String::from(header);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}
