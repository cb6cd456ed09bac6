macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(ShelltagError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(ShelltagError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(ShelltagError::new(ErrorKind::Variant(Message)))
// - err!(Variant(A, B))    -> return Err(ShelltagError::new(ErrorKind::Variant(A, B)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::ShelltagError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($($reason:expr),+)) => {
		return Err(crate::error::ShelltagError::new(
			crate::error::ErrorKind::$variant($($reason),+),
		))
	};
}

// Shorthand for ShelltagError::from(Id3v2Error::new(Id3v2ErrorKind::Foo))
//
// Usage:
//
// - id3v2_err!(Variant)
// - id3v2_err!(Variant(Data))
//
// or bail:
//
// - id3v2_err!(@BAIL Variant)
// - id3v2_err!(@BAIL Variant(Data))
macro_rules! id3v2_err {
	($variant:ident $(($($data:expr),+))?) => {
		Into::<crate::error::ShelltagError>::into(crate::error::Id3v2Error::new(
			crate::error::Id3v2ErrorKind::$variant $(($($data),+))?,
		))
	};
	(@BAIL $variant:ident $(($($data:expr),+))?) => {
		return Err(id3v2_err!($variant $(($($data),+))?))
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`. If `DEFAULT` is missing, it will fall through
// 		 to an empty block.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			_ => { $default }
		}
	};
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr $(,)?)?
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => {}
		}
	};
}

pub(crate) use {err, id3v2_err, parse_mode_choice, try_vec};
