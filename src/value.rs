use crate::repr::Shared;
use ritelinked::LinkedHashMap;
use std::{
    cell::RefCell,
    fmt::{Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    iter::FromIterator,
};

macro_rules! impl_from {
    ($(impl $($from_ty:ty),+ => $ty:ident($conv:ident))+) => {
        $($(impl From<$from_ty> for Value {
            fn from(v: $from_ty) -> Self {
                Self::$ty(v.$conv())
            }
        })+)+
    };
}

macro_rules! as_method {
    {$(#[$meta:meta])* fn $id:ident = $ty:ident$(($op:tt))? -> $r:ty} => {
        $(#[$meta])*
        pub fn $id(&self) -> Option<$r> {
            match self {
                Self::$ty(v) => Some($($op)?v),
                _ => None,
            }
        }
    };
}

/// The sequence data structure of YAML.
pub type Seq = Shared<Vec<Value>>;
/// The map data structure of YAML, keeps the insertion order.
pub type Map = Shared<LinkedHashMap<Value, Value>>;

/// The value tree produced by loading and consumed by dumping.
///
/// This type can convert from primitive types by `From` and `Into` traits.
///
/// ```
/// use yaml_codec::Value;
///
/// assert_eq!(Value::Int(20), 20.into());
/// assert_eq!(Value::Float(0.001), 1e-3.into());
/// assert_eq!(Value::Str("a".into()), "a".into());
/// ```
///
/// Also, the iterators can turn into sequences and maps.
///
/// ```
/// use yaml_codec::{yaml_map, yaml_seq, Value};
///
/// let v = vec![Value::from(1), Value::from(2), Value::from(3)];
/// assert_eq!(Value::from_iter(v), yaml_seq![1, 2, 3]);
/// let m = vec![(Value::from(1), Value::from(2)), (Value::from(3), Value::from(4))];
/// assert_eq!(Value::from_iter(m), yaml_map! {1 => 2, 3 => 4});
/// ```
///
/// Sequences and maps are shared holders, see [`Shared`].
/// Equality is structural; maps compare without regard to key order.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Str(String),
    /// Date, optionally with time and offset
    Timestamp(Timestamp),
    /// Binary data
    Binary(Vec<u8>),
    /// Sequence
    Seq(Seq),
    /// Map
    Map(Map),
}

impl Value {
    /// Create an empty sequence.
    pub fn new_seq() -> Self {
        Self::Seq(Seq::default())
    }

    /// Create an empty map.
    pub fn new_map() -> Self {
        Self::Map(Map::default())
    }

    /// Check the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check the value is a scalar, not a collection.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Seq(_) | Self::Map(_))
    }

    /// The name of the value shape, used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Timestamp(_) => "timestamp",
            Self::Binary(_) => "binary",
            Self::Seq(_) => "seq",
            Self::Map(_) => "map",
        }
    }

    as_method! {
        /// Convert to boolean.
        ///
        /// ```
        /// use yaml_codec::Value;
        /// assert!(Value::from(true).as_bool().unwrap());
        /// ```
        fn as_bool = Bool(*) -> bool
    }

    as_method! {
        /// Convert to integer.
        fn as_int = Int(*) -> i64
    }

    as_method! {
        /// Convert to string pointer.
        fn as_str = Str -> &str
    }

    as_method! {
        /// Convert to the sequence holder.
        fn as_seq = Seq -> &Seq
    }

    as_method! {
        /// Convert to the map holder.
        fn as_map = Map -> &Map
    }

    /// Convert to float, integers are widened.
    ///
    /// ```
    /// use yaml_codec::Value;
    /// assert_eq!(Some(20.06), Value::from(20.06).as_float());
    /// assert_eq!(Some(60.), Value::from(60).as_float());
    /// ```
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get a map value by key, the value is a cheap clone.
    ///
    /// ```
    /// use yaml_codec::{yaml_map, Value};
    /// let m = yaml_map! {"a" => yaml_map! {"b" => 30.}};
    /// assert_eq!(Some(Value::from(30.)), m.get("a").and_then(|a| a.get("b")));
    /// ```
    pub fn get<K: Into<Value>>(&self, key: K) -> Option<Value> {
        match self {
            Self::Map(m) => m.borrow().get(&key.into()).cloned(),
            _ => None,
        }
    }

    /// Get a sequence item by index, the value is a cheap clone.
    pub fn at(&self, index: usize) -> Option<Value> {
        match self {
            Self::Seq(s) => s.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// The identity of a collection holder, `None` for scalars.
    pub fn id(&self) -> Option<usize> {
        match self {
            Self::Seq(s) => Some(s.id()),
            Self::Map(m) => Some(m.id()),
            _ => None,
        }
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

thread_local! {
    static COMPARING: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

/// Compare the data of two holders.
///
/// A pair of holders met again inside its own comparison is taken as equal,
/// so cyclic trees compare by their shape.
fn shared_eq<T>(a: &Shared<T>, b: &Shared<T>, f: impl FnOnce(&T, &T) -> bool) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let pair = (a.id(), b.id());
    if COMPARING.with(|c| c.borrow().contains(&pair)) {
        return true;
    }
    let (Some(a), Some(b)) = (a.try_borrow(), b.try_borrow()) else {
        return false;
    };
    COMPARING.with(|c| c.borrow_mut().push(pair));
    let r = f(&a, &b);
    COMPARING.with(|c| c.borrow_mut().pop());
    r
}

impl PartialEq for Value {
    fn eq(&self, rhs: &Self) -> bool {
        match (self, rhs) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_eq(*a, *b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => shared_eq(a, b, |a, b| a == b),
            (Self::Map(a), Self::Map(b)) => shared_eq(a, b, |a, b| {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(f) => {
                // Keep consistent with `float_eq`
                let f = if *f == 0. { 0. } else { *f };
                if f.is_nan() {
                    f64::NAN.to_bits().hash(state)
                } else {
                    f.to_bits().hash(state)
                }
            }
            Self::Str(s) => s.hash(state),
            Self::Timestamp(t) => t.hash(state),
            Self::Binary(b) => b.hash(state),
            // Shallow, the items may refer to the sequence itself
            Self::Seq(s) => {
                if let Some(s) = s.try_borrow() {
                    s.len().hash(state);
                }
            }
            Self::Map(m) => {
                if let Some(m) = m.try_borrow() {
                    m.len().hash(state);
                }
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl_from! {
    impl char, String, &String => Str(to_string)
    impl u8, u16, u32, i8, i16, i32, i64 => Int(into)
    impl f32, f64 => Float(into)
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Self::Seq(a.into())
    }
}

impl From<LinkedHashMap<Value, Value>> for Value {
    fn from(m: LinkedHashMap<Value, Value>) -> Self {
        Self::Map(m.into())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self::Seq(iter.into_iter().collect::<Vec<_>>().into())
    }
}

impl FromIterator<(Value, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        Self::Map(iter.into_iter().collect::<LinkedHashMap<_, _>>().into())
    }
}

/// A calendar date with optional time of day and UTC offset.
///
/// The value keeps the lexical fields, it is not normalized to UTC.
///
/// ```
/// use yaml_codec::Timestamp;
///
/// let t = Timestamp::date(2002, 12, 14);
/// assert_eq!("2002-12-14", t.to_string());
/// let t = t.time(21, 59, 43).nanosecond(100_000_000).offset(-300);
/// assert_eq!("2002-12-14T21:59:43.1-05:00", t.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Year
    pub year: u16,
    /// Month, 1 to 12
    pub month: u8,
    /// Day, 1 to 31
    pub day: u8,
    /// Time of day (hour, minute, second), absent for a bare date.
    pub time: Option<(u8, u8, u8)>,
    /// Fraction of the second
    pub nanosecond: u32,
    /// Offset from UTC in minutes, absent for a local time.
    pub offset: Option<i32>,
}

impl Timestamp {
    /// Create a bare date.
    pub fn date(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            time: None,
            nanosecond: 0,
            offset: None,
        }
    }

    /// Builder function for the time of day.
    pub fn time(mut self, hour: u8, minute: u8, second: u8) -> Self {
        self.time = Some((hour, minute, second));
        self
    }

    /// Builder function for the fraction of the second.
    pub fn nanosecond(mut self, nanosecond: u32) -> Self {
        self.nanosecond = nanosecond;
        self
    }

    /// Builder function for the UTC offset in minutes.
    pub fn offset(mut self, minutes: i32) -> Self {
        self.offset = Some(minutes);
        self
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        let Some((h, m, s)) = self.time else {
            return Ok(());
        };
        write!(f, "T{:02}:{:02}:{:02}", h, m, s)?;
        if self.nanosecond > 0 {
            let frac = format!("{:09}", self.nanosecond);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        match self.offset {
            Some(0) => f.write_str("Z"),
            Some(o) => {
                let sign = if o < 0 { '-' } else { '+' };
                write!(f, "{}{:02}:{:02}", sign, o.abs() / 60, o.abs() % 60)
            }
            None => Ok(()),
        }
    }
}
