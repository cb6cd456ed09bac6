//! Frame ID tables between ID3v2.2, ID3v2.3, and ID3v2.4
//!
//! Frames are always held with their ID3v2.4 IDs in memory. IDs are upgraded when read, and
//! downgraded again when an older version is written.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Upgrade an ID3v2.2 key to an ID3v2.4 key
///
/// `TDA` and `TIM` map to their ID3v2.3 counterparts, as they only exist as parts of `TDRC` in
/// ID3v2.4.
///
/// # Examples
///
/// ```rust
/// use shelltag::id3::v2::upgrade_v2;
///
/// let old_title = "TT2";
/// let new_title = upgrade_v2(old_title);
///
/// assert_eq!(new_title, Some("TIT2"));
/// ```
pub fn upgrade_v2(key: &str) -> Option<&'static str> {
	v2keys().get(key).copied()
}

/// Upgrade an ID3v2.3 key to an ID3v2.4 key
///
/// # Examples
///
/// ```rust
/// use shelltag::id3::v2::upgrade_v3;
///
/// let old_year = "TYER";
/// let new_year = upgrade_v3(old_year);
///
/// assert_eq!(new_year, Some("TDRC"));
/// ```
pub fn upgrade_v3(key: &str) -> Option<&'static str> {
	v3keys().get(key).copied()
}

macro_rules! gen_upgrades {
	(V2 => [$($v2_key:literal => $id3v24_from_v2:literal),+ $(,)?]; V3 => [$($v3_key:literal => $id3v24_from_v3:literal),+ $(,)?]) => {
		fn v2keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| HashMap::from([$(($v2_key, $id3v24_from_v2)),+]))
		}

		fn v3keys() -> &'static HashMap<&'static str, &'static str> {
			static INSTANCE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
			INSTANCE.get_or_init(|| HashMap::from([$(($v3_key, $id3v24_from_v3)),+]))
		}
	};
}

gen_upgrades!(
	// ID3v2.2 => ID3v2.4
	V2 => [
		"BUF" => "RBUF",
		"CNT" => "PCNT",
		"COM" => "COMM",
		"CRA" => "AENC",
		"ETC" => "ETCO",
		"GEO" => "GEOB",
		"IPL" => "TIPL",
		"MCI" => "MCDI",
		"MLL" => "MLLT",
		"PIC" => "APIC",
		"POP" => "POPM",
		"REV" => "RVRB",
		"SLT" => "SYLT",
		"STC" => "SYTC",
		"TAL" => "TALB",
		"TBP" => "TBPM",
		"TCM" => "TCOM",
		"TCO" => "TCON",
		"TCP" => "TCMP",
		"TCR" => "TCOP",
		"TDA" => "TDAT",
		"TDY" => "TDLY",
		"TEN" => "TENC",
		"TFT" => "TFLT",
		"TIM" => "TIME",
		"TKE" => "TKEY",
		"TLA" => "TLAN",
		"TLE" => "TLEN",
		"TMT" => "TMED",
		"TOA" => "TOPE",
		"TOF" => "TOFN",
		"TOL" => "TOLY",
		"TOR" => "TDOR",
		"TOT" => "TOAL",
		"TP1" => "TPE1",
		"TP2" => "TPE2",
		"TP3" => "TPE3",
		"TP4" => "TPE4",
		"TPA" => "TPOS",
		"TPB" => "TPUB",
		"TRC" => "TSRC",
		"TRK" => "TRCK",
		"TS2" => "TSO2",
		"TSA" => "TSOA",
		"TSC" => "TSOC",
		"TSP" => "TSOP",
		"TSS" => "TSSE",
		"TST" => "TSOT",
		"TT1" => "TIT1",
		"TT2" => "TIT2",
		"TT3" => "TIT3",
		"TXT" => "TEXT",
		"TXX" => "TXXX",
		"TYE" => "TDRC",
		"UFI" => "UFID",
		"ULT" => "USLT",
		"WAF" => "WOAF",
		"WAR" => "WOAR",
		"WAS" => "WOAS",
		"WCM" => "WCOM",
		"WCP" => "WCOP",
		"WPB" => "WPUB",
		"WXX" => "WXXX",
	];
	// ID3v2.3 => ID3v2.4
	V3 => [
		"TORY" => "TDOR",
		"TYER" => "TDRC",
		"IPLS" => "TIPL",
	]
);

/// Downgrade an ID3v2.4 key to an ID3v2.2 key
///
/// `TDRC` and `TDOR` are not listed, they are split into `TYE`/`TDA`/`TIM` and `TOR` by the writer.
pub(crate) fn downgrade_v4_to_v2(key: &str) -> Option<&'static str> {
	let v2_key = match key {
		"AENC" => "CRA",
		"APIC" => "PIC",
		"COMM" => "COM",
		"ETCO" => "ETC",
		"GEOB" => "GEO",
		"MCDI" => "MCI",
		"MLLT" => "MLL",
		"PCNT" => "CNT",
		"POPM" => "POP",
		"RBUF" => "BUF",
		"RVRB" => "REV",
		"SYLT" => "SLT",
		"SYTC" => "STC",
		"TALB" => "TAL",
		"TBPM" => "TBP",
		"TCMP" => "TCP",
		"TCOM" => "TCM",
		"TCON" => "TCO",
		"TCOP" => "TCR",
		"TDAT" => "TDA",
		"TDLY" => "TDY",
		"TENC" => "TEN",
		"TEXT" => "TXT",
		"TFLT" => "TFT",
		"TIME" => "TIM",
		"TIPL" => "IPL",
		"TIT1" => "TT1",
		"TIT2" => "TT2",
		"TIT3" => "TT3",
		"TKEY" => "TKE",
		"TLAN" => "TLA",
		"TLEN" => "TLE",
		"TMED" => "TMT",
		"TOAL" => "TOT",
		"TOFN" => "TOF",
		"TOLY" => "TOL",
		"TOPE" => "TOA",
		"TPE1" => "TP1",
		"TPE2" => "TP2",
		"TPE3" => "TP3",
		"TPE4" => "TP4",
		"TPOS" => "TPA",
		"TPUB" => "TPB",
		"TRCK" => "TRK",
		"TSO2" => "TS2",
		"TSOA" => "TSA",
		"TSOC" => "TSC",
		"TSOP" => "TSP",
		"TSOT" => "TST",
		"TSRC" => "TRC",
		"TSSE" => "TSS",
		"TXXX" => "TXX",
		"UFID" => "UFI",
		"USLT" => "ULT",
		"WCOM" => "WCM",
		"WCOP" => "WCP",
		"WOAF" => "WAF",
		"WOAR" => "WAR",
		"WOAS" => "WAS",
		"WPUB" => "WPB",
		"WXXX" => "WXX",
		_ => return None,
	};

	Some(v2_key)
}
