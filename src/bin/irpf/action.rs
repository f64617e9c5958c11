pub enum Action {
    Positions {year: Option<i32>},
    Income {year: Option<i32>},
    History {symbol: Option<String>},
    Portfolio {years: Option<u32>},
}
