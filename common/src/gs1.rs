//! GS1プレフィックス参照モジュール
//!
//! EAN-13先頭桁から発行国・用途を引く。3桁テーブルを先に参照し、
//! 該当がなければ2桁テーブルにフォールバックする。

/// 13桁以外の入力
pub const INVALID_FORMAT: &str = "Formato inválido";

/// どのテーブルにも該当しない
pub const UNKNOWN_ORIGIN: &str = "Desconhecido";

/// (開始, 終了, 国・用途) の3桁プレフィックス範囲（両端含む）
pub const PREFIX3_RANGES: &[(u16, u16, &str)] = &[
    (0, 9, "EUA/Canadá (UPC)"),
    (30, 39, "França"),
    (40, 44, "Alemanha"),
    (45, 45, "Japão"),
    (46, 48, "Rússia"),
    (49, 49, "Japão"),
    (50, 50, "Reino Unido"),
    (54, 54, "Bélgica/Luxemburgo"),
    (57, 57, "Dinamarca"),
    (59, 59, "Islândia"),
    (60, 60, "Grécia"),
    (64, 64, "Finlândia"),
    (70, 70, "Noruega"),
    (73, 73, "Suécia"),
    (76, 78, "Suíça"),
    (79, 83, "Itália"),
    (84, 86, "Espanha"),
    (87, 89, "Holanda"),
    (90, 92, "Áustria"),
    (93, 93, "Austrália"),
    (94, 94, "Nova Zelândia"),
    (95, 95, "Malásia"),
    (96, 97, "Indonésia"),
    (98, 99, "Singapura"),
    (100, 109, "Rússia"),
    (200, 209, "Uso interno"),
    (300, 309, "França"),
    (380, 380, "Bulgária"),
    (383, 383, "Eslovênia"),
    (385, 385, "Croácia"),
    (387, 387, "Bósnia-Herzegovina"),
    (400, 440, "Alemanha"),
    (450, 459, "Japão"),
    (460, 469, "Rússia"),
    (470, 470, "Quirguistão"),
    (471, 471, "Taiwan"),
    (474, 474, "Estônia"),
    (475, 475, "Letônia"),
    (476, 476, "Azerbaijão"),
    (477, 477, "Lituânia"),
    (478, 478, "Uzbequistão"),
    (479, 479, "Sri Lanka"),
    (480, 480, "Filipinas"),
    (481, 481, "Belarus"),
    (482, 482, "Ucrânia"),
    (484, 484, "Moldávia"),
    (485, 485, "Armênia"),
    (486, 486, "Geórgia"),
    (487, 487, "Cazaquistão"),
    (489, 489, "Hong Kong"),
    (490, 499, "Japão"),
    (500, 509, "Reino Unido"),
    (520, 520, "Grécia"),
    (528, 528, "Líbano"),
    (529, 529, "Chipre"),
    (530, 530, "Albânia"),
    (531, 531, "Macedônia"),
    (535, 535, "Malta"),
    (539, 539, "Irlanda"),
    (540, 549, "Bélgica/Luxemburgo"),
    (560, 560, "Portugal"),
    (569, 569, "Islândia"),
    (570, 579, "Dinamarca"),
    (590, 590, "Polônia"),
    (594, 594, "Romênia"),
    (599, 599, "Hungria"),
    (600, 601, "África do Sul"),
    (603, 603, "Gana"),
    (604, 604, "Senegal"),
    (608, 608, "Bahrein"),
    (609, 609, "Mauritius"),
    (611, 611, "Marrocos"),
    (613, 613, "Argélia"),
    (616, 616, "Quênia"),
    (619, 619, "Tunísia"),
    (621, 621, "Síria"),
    (622, 622, "Egito"),
    (624, 624, "Líbia"),
    (625, 625, "Jordânia"),
    (626, 626, "Irã"),
    (627, 627, "Kuwait"),
    (628, 628, "Arábia Saudita"),
    (629, 629, "Emirados Árabes Unidos"),
    (640, 649, "Finlândia"),
    (690, 699, "China"),
    (700, 709, "Noruega"),
    (729, 729, "Israel"),
    (730, 739, "Suécia"),
    (740, 740, "Guatemala"),
    (741, 741, "El Salvador"),
    (742, 742, "Honduras"),
    (743, 743, "Nicarágua"),
    (744, 744, "Costa Rica"),
    (745, 745, "Panamá"),
    (746, 746, "República Dominicana"),
    (750, 750, "México"),
    (754, 755, "Canadá"),
    (759, 759, "Venezuela"),
    (760, 769, "Suíça"),
    (770, 770, "Colômbia"),
    (773, 773, "Uruguai"),
    (775, 775, "Peru"),
    (777, 777, "Bolívia"),
    (778, 779, "Argentina"),
    (780, 780, "Chile"),
    (784, 784, "Paraguai"),
    (786, 786, "Equador"),
    (789, 790, "Brasil"),
    (800, 839, "Itália"),
    (840, 849, "Espanha"),
    (850, 850, "Cuba"),
    (858, 858, "Eslováquia"),
    (859, 859, "República Tcheca"),
    (860, 860, "Sérvia"),
    (865, 865, "Mongólia"),
    (867, 867, "Coreia do Norte"),
    (868, 869, "Turquia"),
    (870, 879, "Holanda"),
    (880, 880, "Coreia do Sul"),
    (884, 884, "Camboja"),
    (885, 885, "Tailândia"),
    (888, 888, "Singapura"),
    (890, 890, "Índia"),
    (893, 893, "Vietnã"),
    (896, 896, "Paquistão"),
    (899, 899, "Indonésia"),
    (900, 919, "Áustria"),
    (930, 939, "Austrália"),
    (940, 949, "Nova Zelândia"),
    (950, 950, "GS1 Global Office"),
    (955, 955, "Malásia"),
    (958, 958, "Macau"),
    (977, 977, "Publicações periódicas (ISSN)"),
    (978, 979, "Livros (ISBN)"),
    (980, 980, "Recibos de reembolso"),
    (981, 982, "Cupons de desconto"),
    (990, 999, "Cupons"),
];

/// 2桁プレフィックス範囲（3桁で見つからない場合のフォールバック）
pub const PREFIX2_RANGES: &[(u16, u16, &str)] = &[
    (0, 1, "EUA/Canadá (UPC)"),
    (2, 2, "Uso restrito"),
    (3, 3, "França"),
    (4, 4, "Alemanha"),
    (5, 5, "Reino Unido"),
    (6, 6, "China"),
    (7, 7, "Noruega"),
    (8, 8, "Itália"),
    (9, 9, "Áustria"),
    (10, 10, "Rússia"),
    (20, 20, "Uso interno"),
    (30, 39, "França"),
    (40, 44, "Alemanha"),
    (45, 45, "Japão"),
    (46, 48, "Rússia"),
    (49, 49, "Japão"),
    (50, 50, "Reino Unido"),
    (52, 52, "Grécia"),
    (53, 53, "Diversos"),
    (54, 54, "Bélgica/Luxemburgo"),
    (56, 56, "Portugal"),
    (57, 57, "Dinamarca"),
    (59, 59, "Polônia"),
    (60, 60, "África do Sul"),
    (64, 64, "Finlândia"),
    (69, 69, "China"),
    (70, 70, "Noruega"),
    (72, 72, "Israel"),
    (73, 73, "Suécia"),
    (74, 74, "América Central"),
    (75, 75, "México/Canadá"),
    (76, 76, "Suíça"),
    (77, 78, "América do Sul"),
    (79, 79, "Brasil"),
    (80, 80, "Itália"),
    (84, 84, "Espanha"),
    (85, 86, "Diversos"),
    (87, 87, "Holanda"),
    (88, 89, "Ásia"),
    (90, 90, "Áustria"),
    (93, 93, "Austrália"),
    (94, 94, "Nova Zelândia"),
    (95, 95, "Diversos"),
    (97, 97, "Publicações (ISSN)"),
    (98, 98, "Livros (ISBN)"),
];

/// 先頭 `len` 桁を数値として取り出す（数字以外を含めば `None`）
fn numeric_prefix(text: &str, len: usize) -> Option<u16> {
    let prefix = text.as_bytes().get(..len)?;
    if !prefix.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(prefix.iter().fold(0u16, |acc, &b| acc * 10 + u16::from(b - b'0')))
}

fn find_range(ranges: &[(u16, u16, &'static str)], prefix: u16) -> Option<&'static str> {
    ranges
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&prefix))
        .map(|(_, _, name)| *name)
}

/// プレフィックスから国・用途を検索（該当なしは `None`）
pub fn lookup_prefix(text: &str) -> Option<&'static str> {
    numeric_prefix(text, 3)
        .and_then(|p| find_range(PREFIX3_RANGES, p))
        .or_else(|| numeric_prefix(text, 2).and_then(|p| find_range(PREFIX2_RANGES, p)))
}

/// EAN-13の発行国・用途
///
/// - 13桁でなければ `"Formato inválido"`
/// - テーブルに該当しなければ `"Desconhecido"`
///
/// チェックディジットは見ない。
pub fn ean_country(text: &str) -> &'static str {
    if text.len() != 13 {
        return INVALID_FORMAT;
    }
    lookup_prefix(text).unwrap_or(UNKNOWN_ORIGIN)
}
