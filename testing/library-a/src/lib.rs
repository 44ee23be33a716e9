//! Plain records with no factories of their own. Consumers get companion
//! factories generated for them.

pub mod library {

    ///
    /// Point
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }

    ///
    /// Line
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Line {
        pub start: Point,
        pub end: Point,
    }

    ///
    /// Drawing
    ///

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Drawing {
        pub lines: Box<[Line]>,
    }
}
