//! ISO 3166-1 alpha-3 to alpha-2 codes, used to build flag image URLs.

const ISO3_TO_ISO2: &[(&str, &str)] = &[
    ("AFG", "af"), ("ALB", "al"), ("DZA", "dz"), ("AND", "ad"), ("AGO", "ao"), ("ARG", "ar"),
    ("ARM", "am"), ("AUS", "au"), ("AUT", "at"), ("AZE", "az"), ("BHS", "bs"), ("BHR", "bh"),
    ("BGD", "bd"), ("BRB", "bb"), ("BLR", "by"), ("BEL", "be"), ("BLZ", "bz"), ("BEN", "bj"),
    ("BTN", "bt"), ("BOL", "bo"), ("BIH", "ba"), ("BWA", "bw"), ("BRA", "br"), ("BRN", "bn"),
    ("BGR", "bg"), ("BFA", "bf"), ("BDI", "bi"), ("KHM", "kh"), ("CMR", "cm"), ("CAN", "ca"),
    ("CPV", "cv"), ("CAF", "cf"), ("TCD", "td"), ("CHL", "cl"), ("CHN", "cn"), ("COL", "co"),
    ("COM", "km"), ("COG", "cg"), ("COD", "cd"), ("CRI", "cr"), ("CIV", "ci"), ("HRV", "hr"),
    ("CUB", "cu"), ("CYP", "cy"), ("CZE", "cz"), ("DNK", "dk"), ("DJI", "dj"), ("DMA", "dm"),
    ("DOM", "do"), ("ECU", "ec"), ("EGY", "eg"), ("SLV", "sv"), ("GNQ", "gq"), ("ERI", "er"),
    ("EST", "ee"), ("ETH", "et"), ("FJI", "fj"), ("FIN", "fi"), ("FRA", "fr"), ("GAB", "ga"),
    ("GMB", "gm"), ("GEO", "ge"), ("DEU", "de"), ("GHA", "gh"), ("GRC", "gr"), ("GRD", "gd"),
    ("GTM", "gt"), ("GIN", "gn"), ("GNB", "gw"), ("GUY", "gy"), ("HTI", "ht"), ("HND", "hn"),
    ("HUN", "hu"), ("ISL", "is"), ("IND", "in"), ("IDN", "id"), ("IRN", "ir"), ("IRQ", "iq"),
    ("IRL", "ie"), ("ISR", "il"), ("ITA", "it"), ("JAM", "jm"), ("JPN", "jp"), ("JOR", "jo"),
    ("KAZ", "kz"), ("KEN", "ke"), ("KIR", "ki"), ("KWT", "kw"), ("KGZ", "kg"), ("LAO", "la"),
    ("LVA", "lv"), ("LBN", "lb"), ("LSO", "ls"), ("LBR", "lr"), ("LBY", "ly"), ("LIE", "li"),
    ("LTU", "lt"), ("LUX", "lu"), ("MKD", "mk"), ("MDG", "mg"), ("MWI", "mw"), ("MYS", "my"),
    ("MDV", "mv"), ("MLI", "ml"), ("MLT", "mt"), ("MHL", "mh"), ("MRT", "mr"), ("MUS", "mu"),
    ("MEX", "mx"), ("FSM", "fm"), ("MDA", "md"), ("MCO", "mc"), ("MNG", "mn"), ("MNE", "me"),
    ("MAR", "ma"), ("MOZ", "mz"), ("MMR", "mm"), ("NAM", "na"), ("NRU", "nr"), ("NPL", "np"),
    ("NLD", "nl"), ("NZL", "nz"), ("NIC", "ni"), ("NER", "ne"), ("NGA", "ng"), ("PRK", "kp"),
    ("NOR", "no"), ("OMN", "om"), ("PAK", "pk"), ("PLW", "pw"), ("PAN", "pa"), ("PNG", "pg"),
    ("PRY", "py"), ("PER", "pe"), ("PHL", "ph"), ("POL", "pl"), ("PRT", "pt"), ("QAT", "qa"),
    ("ROU", "ro"), ("RUS", "ru"), ("RWA", "rw"), ("KNA", "kn"), ("LCA", "lc"), ("VCT", "vc"),
    ("WSM", "ws"), ("SMR", "sm"), ("STP", "st"), ("SAU", "sa"), ("SEN", "sn"), ("SRB", "rs"),
    ("SYC", "sc"), ("SLE", "sl"), ("SGP", "sg"), ("SVK", "sk"), ("SVN", "si"), ("SLB", "sb"),
    ("SOM", "so"), ("ZAF", "za"), ("KOR", "kr"), ("SSD", "ss"), ("ESP", "es"), ("LKA", "lk"),
    ("SDN", "sd"), ("SUR", "sr"), ("SWZ", "sz"), ("SWE", "se"), ("CHE", "ch"), ("SYR", "sy"),
    ("TWN", "tw"), ("TJK", "tj"), ("TZA", "tz"), ("THA", "th"), ("TLS", "tl"), ("TGO", "tg"),
    ("TON", "to"), ("TTO", "tt"), ("TUN", "tn"), ("TUR", "tr"), ("TKM", "tm"), ("TUV", "tv"),
    ("UGA", "ug"), ("UKR", "ua"), ("ARE", "ae"), ("GBR", "gb"), ("USA", "us"), ("URY", "uy"),
    ("UZB", "uz"), ("VUT", "vu"), ("VAT", "va"), ("VEN", "ve"), ("VNM", "vn"), ("YEM", "ye"),
];

/// Lower-case alpha-2 code for an alpha-3 code, if known.
pub fn iso2_for(iso3: &str) -> Option<&'static str> {
    ISO3_TO_ISO2
        .iter()
        .find(|(a3, _)| a3.eq_ignore_ascii_case(iso3))
        .map(|(_, a2)| *a2)
}
