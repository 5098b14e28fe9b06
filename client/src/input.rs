//! Text commands of the interactive `play` session
//!
//! Squares are written as `x,y` (column, row, both from 0) or as a plain
//! board index:
//!
//! ```text
//! place 3 7,7     put the letter in rack slot 3 on the center square
//! swap 0 4        exchange rack slots 0 and 4
//! return 7,7      take the pending tile on 7,7 back
//! submit | clear | refresh | help | quit
//! ```

use crate::error::ClientError;
use crate::game::TileAction;
use shared::{Index, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(TileAction),
    Submit,
    Clear,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
place <slot> <x,y>   move a rack letter onto the board
swap <slot> <slot>   reorder the rack
return <x,y>         take a pending tile back
submit               send the move
clear                take all pending tiles back
refresh              fetch the game again
quit                 leave";

pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["place", slot, square] => Command::Action(TileAction::Place {
            rack_slot: parse_slot(line, slot)?,
            index: parse_square(line, square)?,
        }),
        ["swap", a, b] => Command::Action(TileAction::Swap {
            a: parse_slot(line, a)?,
            b: parse_slot(line, b)?,
        }),
        ["return", square] => Command::Action(TileAction::Return {
            index: parse_square(line, square)?,
        }),
        ["submit"] => Command::Submit,
        ["clear"] => Command::Clear,
        ["refresh"] => Command::Refresh,
        ["help"] | ["?"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        [] => return Err(ClientError::parse(line, "empty command")),
        _ => return Err(ClientError::parse(line, "unknown command, try 'help'")),
    };

    Ok(command)
}

fn parse_slot(line: &str, word: &str) -> Result<usize, ClientError> {
    word.parse()
        .map_err(|_| ClientError::parse(line, format!("'{}' is not a rack slot", word)))
}

pub fn parse_square(line: &str, word: &str) -> Result<Index, ClientError> {
    let off_board = || ClientError::parse(line, format!("'{}' is not on the board", word));

    match word.split_once(',') {
        Some((x, y)) => {
            let x: usize = x.trim().parse().map_err(|_| off_board())?;
            let y: usize = y.trim().parse().map_err(|_| off_board())?;
            Position::new(x, y).map(Position::to_index).ok_or_else(off_board)
        }
        None => {
            let index: usize = word.parse().map_err(|_| off_board())?;
            Index::new(index).ok_or_else(off_board)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(i: usize) -> Index {
        Index::new(i).unwrap()
    }

    #[test]
    fn test_parse_place() {
        assert_eq!(
            parse_command("place 3 7,7").unwrap(),
            Command::Action(TileAction::Place {
                rack_slot: 3,
                index: index(112)
            })
        );
        assert_eq!(
            parse_command("  place 0   224 ").unwrap(),
            Command::Action(TileAction::Place {
                rack_slot: 0,
                index: index(224)
            })
        );
    }

    #[test]
    fn test_parse_swap_and_return() {
        assert_eq!(
            parse_command("swap 0 4").unwrap(),
            Command::Action(TileAction::Swap { a: 0, b: 4 })
        );
        assert_eq!(
            parse_command("return 14,0").unwrap(),
            Command::Action(TileAction::Return { index: index(14) })
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("submit").unwrap(), Command::Submit);
        assert_eq!(parse_command("clear").unwrap(), Command::Clear);
        assert_eq!(parse_command("refresh").unwrap(), Command::Refresh);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("jump").is_err());
        assert!(parse_command("place x 7,7").is_err());
        assert!(parse_command("place 1 15,0").is_err());
        assert!(parse_command("place 1 225").is_err());
        assert!(parse_command("return 3").is_ok());
        assert!(parse_command("swap 1").is_err());

        match parse_command("place 1 a,b") {
            Err(ClientError::Parse { input, reason }) => {
                assert_eq!(input, "place 1 a,b");
                assert!(reason.contains("a,b"));
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }
}
